//! Error types for the backend client.

use retro_core::RetroError;
use thiserror::Error;

/// Errors that can occur when talking to the Supabase backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("Backend error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no session available
    #[error("Authentication required")]
    AuthRequired,

    /// Sign-in or sign-up rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid backend URL
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Request rejected before it was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failed to parse backend response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Requested row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object already exists in the bucket
    #[error("Object already exists: {0}")]
    Conflict(String),

    /// Backend is offline or unreachable
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// IO error while reading upload files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backend client operations.
pub type Result<T> = std::result::Result<T, BackendError>;

impl BackendError {
    /// Classify a transport failure
    pub(crate) fn from_send(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::Unreachable(error.to_string())
        } else {
            Self::Request(error)
        }
    }
}

impl From<BackendError> for RetroError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::AuthRequired | BackendError::AuthFailed(_) => {
                RetroError::Auth(error.to_string())
            }
            BackendError::InvalidInput(msg) => RetroError::InvalidInput(msg),
            BackendError::Request(_) | BackendError::Unreachable(_) => {
                RetroError::Network(error.to_string())
            }
            BackendError::Io(e) => RetroError::Io(e),
            other => RetroError::Other(other.to_string()),
        }
    }
}
