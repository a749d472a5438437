/// Uploader error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UploaderError>;

#[derive(Debug, Error)]
pub enum UploaderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Backend(#[from] retro_backend::BackendError),

    #[error(transparent)]
    Catalog(#[from] retro_core::RetroError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} uploads failed")]
    UploadsFailed { failed: usize, total: usize },
}
