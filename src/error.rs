/// Error types for followup-tracker
///
/// Every failure in the crate ends up as one of these. The HTTP layer turns
/// them into `{"error": message}` bodies with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Main error type for follow-up operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (creating the database directory, binding the socket)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// No follow-up with the requested id
    #[error("{0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for followup-tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    /// Shorthand for the one not-found message the API ever returns
    pub fn followup_not_found() -> Self {
        TrackerError::NotFound("Follow-up not found".to_string())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrackerError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::Database(_) | TrackerError::Io(_) | TrackerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body for every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
