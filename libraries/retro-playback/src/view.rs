//! View-binding helpers
//!
//! Pure functions renderers use to turn controller state into display values.

use crate::types::PlaybackStatus;
use retro_core::{Playlist, TrackId};
use serde::{Deserialize, Serialize};

/// Seek bar upper bound used while the duration is unknown
pub const UNKNOWN_DURATION_SEEK_MAX: f64 = 100.0;

/// Format seconds as `MM:SS`
///
/// Negative or non-finite input renders as `00:00`. Minutes are not capped,
/// so a 2-hour mix shows `120:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "00:00".to_string();
    }

    let total = secs.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Transport label shown above the track title
pub fn status_label(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Playing => "NOW PLAYING",
        PlaybackStatus::Paused | PlaybackStatus::Ended => "PAUSED",
        PlaybackStatus::Loading => "LOADING",
        PlaybackStatus::Idle => "STOPPED",
        PlaybackStatus::Errored => "ERROR",
    }
}

/// Seek bar maximum: the duration, or 100 while unknown
pub fn seek_bar_max(duration_secs: f64) -> f64 {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs
    } else {
        UNKNOWN_DURATION_SEEK_MAX
    }
}

/// One row of the playlist table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRow {
    /// Playlist index
    pub index: usize,
    /// Track id
    pub track_id: TrackId,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Formatted duration
    pub duration: String,
    /// Whether this is the bound track
    pub is_current: bool,
}

/// Build the playlist table rows
pub fn track_rows(playlist: &Playlist, current: Option<usize>) -> Vec<TrackRow> {
    playlist
        .iter()
        .enumerate()
        .map(|(index, track)| TrackRow {
            index,
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            duration: format_time(track.duration_secs),
            is_current: current == Some(index),
        })
        .collect()
}

/// Observable controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Transport status
    pub status: PlaybackStatus,
    /// Position in seconds
    pub position_secs: f64,
    /// Duration in seconds, 0 while unknown
    pub duration_secs: f64,
    /// Stored volume (0.0-1.0)
    pub volume: f32,
    /// Mute flag
    pub muted: bool,
    /// Audible volume
    pub effective_volume: f32,
    /// Bound playlist index; `None` for an empty playlist
    pub current_track_index: Option<usize>,
    /// Bound track id
    pub current_track_id: Option<TrackId>,
}

impl PlayerSnapshot {
    /// Status label for this snapshot
    pub fn status_label(&self) -> &'static str {
        status_label(self.status)
    }

    /// `elapsed / total` time labels
    pub fn time_labels(&self) -> (String, String) {
        (format_time(self.position_secs), format_time(self.duration_secs))
    }

    /// Seek bar maximum
    pub fn seek_bar_max(&self) -> f64 {
        seek_bar_max(self.duration_secs)
    }
}
