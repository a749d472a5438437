/// Playlist domain type
use crate::types::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// Ordered sequence of tracks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Create a playlist from tracks in play order
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Mutable track at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Position of the track with `id`
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Last valid index
    pub fn last_index(&self) -> Option<usize> {
        self.tracks.len().checked_sub(1)
    }

    /// Iterate tracks in order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Iterate tracks mutably in order
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Track> {
        self.tracks.iter_mut()
    }

    /// All tracks as a slice
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl From<Vec<Track>> for Playlist {
    fn from(tracks: Vec<Track>) -> Self {
        Self::new(tracks)
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(TrackId::new(id), format!("Track {}", id), "Artist", format!("https://x/{}.mp3", id))
    }

    #[test]
    fn indexing_and_lookup() {
        let playlist = Playlist::new(vec![track("a"), track("b"), track("c")]);

        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist.last_index(), Some(2));
        assert_eq!(playlist.position_of(&TrackId::new("b")), Some(1));
        assert!(playlist.get(3).is_none());
    }

    #[test]
    fn empty_playlist_has_no_last_index() {
        let playlist = Playlist::default();
        assert!(playlist.is_empty());
        assert_eq!(playlist.last_index(), None);
    }
}
