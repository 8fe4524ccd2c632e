use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use solardesk_core::error::CoreError;
use solardesk_db::repositories::MergeError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`MergeError`] for merge
/// execution failures, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `solardesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A merge execution error from `solardesk_db`.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
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

            // --- MergeError variants ---
            AppError::Merge(merge) => match merge {
                MergeError::InvalidMerge(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_MERGE", msg.clone())
                }
                MergeError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                MergeError::StaleRecord { .. } => {
                    (StatusCode::CONFLICT, "STALE_RECORD", merge.to_string())
                }
                // Implies data-integrity risk: log loudly and surface the
                // underlying cause verbatim rather than swallowing it.
                MergeError::Execution(err) => {
                    tracing::error!(error = %err, "Merge execution failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "MERGE_EXECUTION_ERROR",
                        merge.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => match err {
                sqlx::Error::RowNotFound => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Resource not found".to_string(),
                ),
                other => {
                    tracing::error!(error = %other, "Database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
