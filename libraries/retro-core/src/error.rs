/// Core error types for Retro Rhythm
use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `RetroError`
pub type Result<T> = std::result::Result<T, RetroError>;

/// Core error type for Retro Rhythm
#[derive(Error, Debug)]
pub enum RetroError {
    /// Object storage errors (upload, public URL)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Track table access errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Authentication required or rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl RetroError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
