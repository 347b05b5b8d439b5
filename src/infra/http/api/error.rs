use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::{ErrorReport, ServiceError};

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const BACKEND_UNAVAILABLE: &str = "backend_unavailable";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
    report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
            report: None,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Maps a service failure to its response, keeping the full error chain for the logs.
    pub fn from_service(source: &'static str, err: ServiceError) -> Self {
        let (status, code, message, hint) = match &err {
            ServiceError::NotFound { entity } => (
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
                not_found_message(entity),
                None,
            ),
            ServiceError::InvalidInput(reason) => (
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "Invalid input".to_string(),
                Some(reason.clone()),
            ),
            ServiceError::BackendUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                codes::BACKEND_UNAVAILABLE,
                "Backend unavailable".to_string(),
                None,
            ),
        };

        Self {
            status,
            code,
            message,
            hint,
            report: Some(ErrorReport::from_error(source, status, &err)),
        }
    }
}

fn not_found_message(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = self.report.unwrap_or_else(|| {
            ErrorReport::from_message(
                "infra::http::api",
                self.status,
                format!(
                    "{}: {}",
                    self.code,
                    self.hint.as_deref().unwrap_or(&self.message)
                ),
            )
        });
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use crate::application::repos::RepoError;

    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (
                ServiceError::NotFound { entity: "user" },
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::InvalidInput("bad order".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::BackendUnavailable(RepoError::Timeout),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from_service("test", err).status(), status);
        }
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(not_found_message("user"), "User not found");
        assert_eq!(not_found_message("manga"), "Manga not found");
    }
}
