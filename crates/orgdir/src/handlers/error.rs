use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use orgdir_core::service::{service_error_to_status_code, ServiceError};
use orgdir_core::storage::{repository_error_to_status_code, RepositoryError};

/// Application error type that wraps `anyhow::Error`.
///
/// Service and repository errors keep their status code; anything else is a
/// 500. The body is always `{"status": <code>, "message": <text>}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(error) = self.0.downcast_ref::<ServiceError>() {
            service_error_to_status_code(error)
        } else if let Some(error) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(error)
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request rejected");
        }

        error_response(status, self.0.to_string())
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Renders the JSON error body shared by handlers and middleware.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = json!({
        "status": status.as_u16(),
        "message": message.into(),
    });
    (status, Json(body)).into_response()
}
