//! Application-level error type for HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use defter_core::error::CoreError;
use defter_db::StoreError;
use serde_json::json;

/// Wraps storage and domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A storage-boundary error from `defter-db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A domain-level error from `defter-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Store(store) => match store {
                StoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                StoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                StoreError::Backend(err) => {
                    tracing::error!(error = %err, "Backend failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "BACKEND_ERROR",
                        "A storage error occurred".to_string(),
                    )
                }
                StoreError::Serde(err) => {
                    tracing::error!(error = %err, "Local store serialization failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "BACKEND_ERROR",
                        "A storage error occurred".to_string(),
                    )
                }
                StoreError::Io(err) => {
                    tracing::error!(error = %err, "Local store I/O failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "BACKEND_ERROR",
                        "A storage error occurred".to_string(),
                    )
                }
            },

            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
