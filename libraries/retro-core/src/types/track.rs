/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Playable audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Duration in seconds, 0 while unknown
    ///
    /// Placeholder until the audio resource has reported loaded metadata
    /// (or a duration probe filled it in).
    #[serde(default)]
    pub duration_secs: f64,

    /// Playable audio resource URI
    pub source_url: String,
}

impl Track {
    /// Create a track whose duration has not been probed yet
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            duration_secs: 0.0,
            source_url: source_url.into(),
        }
    }

    /// Builder-style duration setter
    #[must_use]
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.set_duration(duration_secs);
        self
    }

    /// Whether the duration has been probed
    pub fn has_known_duration(&self) -> bool {
        self.duration_secs > 0.0
    }

    /// Record a probed duration
    ///
    /// Negative or non-finite values are stored as the 0 placeholder.
    pub fn set_duration(&mut self, duration_secs: f64) {
        self.duration_secs = if duration_secs.is_finite() && duration_secs > 0.0 {
            duration_secs
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_track_has_placeholder_duration() {
        let track = Track::new(TrackId::new("1"), "Skyfall", "Adele", "https://x/skyfall.opus");
        assert_eq!(track.duration_secs, 0.0);
        assert!(!track.has_known_duration());
    }

    #[test]
    fn invalid_durations_fall_back_to_placeholder() {
        let mut track = Track::new(TrackId::new("1"), "t", "a", "u");

        track.set_duration(f64::NAN);
        assert_eq!(track.duration_secs, 0.0);

        track.set_duration(-3.0);
        assert_eq!(track.duration_secs, 0.0);

        track.set_duration(215.4);
        assert!(track.has_known_duration());
    }

    #[test]
    fn missing_artist_deserializes_empty() {
        let json = r#"{"id":"9","title":"Untitled","source_url":"https://x/a.mp3"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.artist, "");
        assert_eq!(track.duration_secs, 0.0);
    }
}
