//! Client error types

use portal_session::SessionError;
use portal_types::ValidationReport;
use thiserror::Error;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-validation API error response
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Field-level rejection from the backend serializer
    #[error("validation rejected by server")]
    Validation(ValidationReport),

    /// The access token expired and could not be refreshed; the session has
    /// been cleared and the user must log in again
    #[error("session expired")]
    SessionExpired,

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Session persistence error
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
