//! Error types for the playback controller

use retro_core::RetroError;
use thiserror::Error;

/// Playback errors
///
/// Load and play failures raised by the audio facility are turned into
/// [`PlayerEvent`](crate::PlayerEvent)s by the controller; these variants
/// only reach callers for invalid requests and backend access.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Audio resource could not be created or its metadata failed to load
    #[error("Failed to load audio resource: {0}")]
    ResourceLoad(String),

    /// Host refused to start playback without a user gesture
    #[error("Playback blocked until you interact with the page")]
    PolicyDenied,

    /// Host rejected a play request for another reason
    #[error("Playback failed: {0}")]
    PlayFailed(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// No tracks bound
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Track catalog access failed
    #[error(transparent)]
    Backend(#[from] RetroError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
