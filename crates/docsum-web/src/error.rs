//! Error types for the web server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Server error type.
///
/// Upload problems are not errors here; they are rendered back onto the
/// page. These are failures of the server itself.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Core library error (configuration, storage setup).
    #[error(transparent)]
    Core(#[from] docsum_core::Error),

    /// Page template failed to compile or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Socket error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        tracing::error!(status = %status, error = %self, "Server error");
        (status, "Internal server error").into_response()
    }
}
