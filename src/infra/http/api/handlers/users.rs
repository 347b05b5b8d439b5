//! User and favorites handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;

use crate::domain::types::ToggleOutcome;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{
    CreateUserRequest, EmailQuery, FavoriteQuery, FavoriteResponse, SuccessResponse,
};
use crate::infra::http::api::state::HttpState;

const SOURCE: &str = "infra::http::api::users";

pub async fn get_user(
    State(state): State<HttpState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .favorites
        .get_user(&email)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<HttpState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload
        .map_err(|err| ApiError::bad_request("Invalid user payload", Some(err.body_text())))?;

    let user = state
        .favorites
        .create_user_if_not_exists(request.into())
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(user))
}

pub async fn toggle_favorite(
    State(state): State<HttpState>,
    Path((name, email)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .favorites
        .toggle_favorite(&email, &name)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;

    let success = match outcome {
        ToggleOutcome::Added => "Manga added",
        ToggleOutcome::Removed => "Manga delete",
    };
    Ok(Json(SuccessResponse { success }))
}

pub async fn is_favorite(
    State(state): State<HttpState>,
    Query(query): Query<FavoriteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let is_favorite = state
        .favorites
        .is_favorite(&query.email, &query.name)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(FavoriteResponse { is_favorite }))
}

pub async fn list_favorites(
    State(state): State<HttpState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mangas = state
        .favorites
        .list_favorite_mangas(&query.email)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(mangas))
}

pub async fn delete_user(
    State(state): State<HttpState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .favorites
        .delete_user(&query.email)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(SuccessResponse {
        success: "User deleted",
    }))
}
