//! Player Events
//!
//! Event-based communication for view synchronization. Events are emitted at
//! transport changes, position ticks (at the host's timeupdate cadence), when
//! metadata reports a duration, on track changes and on volume changes.
//! Load and play failures are delivered here too instead of as errors.

use crate::types::PlaybackStatus;
use retro_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Transport status changed
    StatusChanged {
        /// The new status
        status: PlaybackStatus,
    },

    /// Playback position moved (tick, seek or reset)
    PositionChanged {
        /// Current position in seconds
        position_secs: f64,
    },

    /// The bound resource reported its duration
    DurationKnown {
        /// Track duration in seconds
        duration_secs: f64,
    },

    /// A playlist row learned its duration from a background probe
    TrackDurationKnown {
        /// Playlist index of the row
        index: usize,
        /// ID of the track
        track_id: TrackId,
        /// Track duration in seconds
        duration_secs: f64,
    },

    /// A different track was bound
    TrackChanged {
        /// Playlist index of the new track
        index: usize,
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previously bound track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Stored level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
        /// Audible level
        effective: f32,
    },

    /// Host refused to start playback; a user gesture is needed
    PlaybackBlocked {
        /// Track that could not start
        track_id: TrackId,
        /// Notice to show the user
        message: String,
    },

    /// Non-fatal failure (load error, rejected play)
    Error {
        /// Track the failure belongs to
        track_id: Option<TrackId>,
        /// Error message
        message: String,
    },
}
