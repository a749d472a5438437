//! Core types for playback control

use serde::{Deserialize, Serialize};

/// Transport status of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No track bound
    Idle,

    /// Resource acquired, waiting for it to become playable
    Loading,

    /// Audio output is requested to render
    Playing,

    /// Bound but not rendering
    Paused,

    /// Current track reached its natural end
    Ended,

    /// Current track failed to load
    Errored,
}

/// What happens after the last track ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfPlaylist {
    /// Pause at position 0 of the last track
    #[default]
    Stop,

    /// Wrap to the first track and keep playing
    Loop,
}

/// Configuration for the playback controller
///
/// One controller serves every player view; the presets cover the library
/// player and the single-source mini player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Start playing as soon as a playlist is bound (default: false)
    pub auto_play: bool,

    /// Move to the next track when one ends (default: true)
    pub advance_on_end: bool,

    /// Past this position `previous_track` restarts instead of going back
    /// (default: 3.0 seconds)
    pub restart_threshold_secs: f64,

    /// Behavior after the last track ends (default: Stop)
    pub end_of_playlist: EndOfPlaylist,

    /// Initial volume (0.0-1.0, default: 0.7)
    pub initial_volume: f32,
}

impl ControllerConfig {
    /// Library view: manual start, advance through the playlist
    pub fn full_player() -> Self {
        Self::default()
    }

    /// Mini player: single source that starts on its own and stops at the end
    pub fn mini_player() -> Self {
        Self {
            auto_play: true,
            advance_on_end: false,
            ..Self::default()
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            auto_play: false,
            advance_on_end: true,
            restart_threshold_secs: 3.0,
            end_of_playlist: EndOfPlaylist::Stop,
            initial_volume: 0.7,
        }
    }
}
