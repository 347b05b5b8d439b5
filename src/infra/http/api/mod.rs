pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::HttpState;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/mangas", get(handlers::list_mangas))
        .route("/search", get(handlers::list_mangas))
        .route("/manga", get(handlers::get_manga))
        .route("/manga/{name}/{chapter}", get(handlers::get_chapter))
        .route("/popular", get(handlers::list_popular))
        .route("/filter", get(handlers::filter_mangas))
        .route("/user/create", post(handlers::create_user))
        .route("/user/delete", delete(handlers::delete_user))
        .route("/user/favorite/one", get(handlers::is_favorite))
        .route("/user/favorite/list", get(handlers::list_favorites))
        .route(
            "/user/favorite/{name}/{email}",
            post(handlers::toggle_favorite),
        )
        .route("/user/{email}", get(handlers::get_user))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

/// CORS policy restricted to the configured front-end origins.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    target = "manka::http",
                    origin = %origin,
                    error = %err,
                    "ignoring malformed CORS origin"
                );
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
