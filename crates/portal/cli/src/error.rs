//! CLI error types

use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Backend or transport error
    #[error(transparent)]
    Client(#[from] portal_client::ClientError),

    /// Session persistence error
    #[error("session error: {0}")]
    Session(#[from] portal_session::SessionError),

    /// Malformed quitus code
    #[error("code invalide: {0}")]
    Code(#[from] portal_types::EligibilityError),

    /// Refused by the local role guard
    #[error("accès refusé: {0}")]
    Forbidden(String),

    /// Invalid input
    #[error("entrée invalide: {0}")]
    InvalidInput(String),

    /// Interactive prompt error
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
