//! Session error types

use thiserror::Error;

/// Session error types
#[derive(Debug, Error)]
pub enum SessionError {
    /// Credential storage failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted state could not be decoded
    #[error("corrupt persisted state: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
