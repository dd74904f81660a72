//! Unified error handling.
//!
//! Handlers answer most failures with a flash message and a redirect. The
//! failures that cannot be answered that way (a page that will not render, a
//! broken session) become an `AppError`, which is logged and turned into a
//! response without internal details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::renderer::RenderError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// A page could not be rendered.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Repository(RepositoryError::NotFound) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(RepositoryError::Timeout) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Repository(_) | Self::Render(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
            Self::Repository(RepositoryError::NotFound) => "Not found".to_string(),
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
