//! Catalog handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{MangaNameQuery, filter_params_from_pairs};
use crate::infra::http::api::state::HttpState;

pub const CACHE_HEADER: &str = "x-cache";

const SOURCE: &str = "infra::http::api::catalog";

pub async fn list_mangas(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    let mangas = state
        .catalog
        .list_mangas()
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(mangas))
}

pub async fn list_popular(State(state): State<HttpState>) -> Result<impl IntoResponse, ApiError> {
    let mangas = state
        .catalog
        .list_popular()
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(mangas))
}

pub async fn get_manga(
    State(state): State<HttpState>,
    Query(query): Query<MangaNameQuery>,
) -> Result<Response, ApiError> {
    if query.name.trim().is_empty() {
        return Err(ApiError::bad_request(
            "Missing manga name",
            Some("pass ?name=<manga>".to_string()),
        ));
    }

    let (manga, outcome) = state
        .catalog
        .get_manga(&query.name)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;

    let mut response = Json(manga).into_response();
    response
        .headers_mut()
        .insert(CACHE_HEADER, HeaderValue::from_static(outcome.as_str()));
    Ok(response)
}

pub async fn get_chapter(
    State(state): State<HttpState>,
    Path((name, chapter)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let chapter: i32 = chapter.trim().parse().map_err(|_| {
        ApiError::bad_request(
            "Invalid chapter number",
            Some(format!("`{chapter}` is not an integer")),
        )
    })?;

    let record = state
        .catalog
        .get_chapter(&name, chapter)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(record))
}

pub async fn filter_mangas(
    State(state): State<HttpState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let params = filter_params_from_pairs(pairs);
    let mangas = state
        .catalog
        .filter_mangas(params)
        .await
        .map_err(|err| ApiError::from_service(SOURCE, err))?;
    Ok(Json(mangas))
}
