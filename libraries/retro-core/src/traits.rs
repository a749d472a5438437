/// Collaborator traits for Retro Rhythm
///
/// The player never talks to the backend directly; it consumes these traits.
/// `retro-backend` provides the HTTP implementations.
use crate::error::Result;
use crate::types::{Track, TrackId};
use async_trait::async_trait;

/// Remote track listing, metadata and URL issuance
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// List all tracks, newest first
    async fn list_tracks(&self) -> Result<Vec<Track>>;

    /// Get a single track
    ///
    /// # Errors
    /// Returns `RetroError::TrackNotFound` if no track has this id
    async fn get_track(&self, id: &TrackId) -> Result<Track>;

    /// Resolve a storage path into a playable URI
    ///
    /// The URI is either publicly resolvable or signed; callers treat it as
    /// opaque and store it in `Track::source_url`.
    async fn resolve_playable_url(&self, storage_path: &str) -> Result<String>;

    /// Insert a freshly uploaded file into the track table
    ///
    /// The new track starts with the 0 duration placeholder.
    async fn record_uploaded_track(&self, title: &str, storage_path: &str) -> Result<Track>;

    /// Persist a probed duration
    async fn update_track_duration(&self, id: &TrackId, duration_secs: f64) -> Result<()>;
}

/// Object storage for audio files
#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Upload file contents under `name`
    ///
    /// Returns the storage path to hand to `TrackCatalog::record_uploaded_track`.
    async fn upload_file(&self, bytes: Vec<u8>, name: &str, content_type: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetroError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryCatalog {
        tracks: Mutex<Vec<Track>>,
    }

    #[async_trait]
    impl TrackCatalog for MemoryCatalog {
        async fn list_tracks(&self) -> Result<Vec<Track>> {
            let tracks = self.tracks.lock().map_err(|e| RetroError::Other(e.to_string()))?;
            Ok(tracks.iter().rev().cloned().collect())
        }

        async fn get_track(&self, id: &TrackId) -> Result<Track> {
            self.list_tracks()
                .await?
                .into_iter()
                .find(|t| &t.id == id)
                .ok_or_else(|| RetroError::TrackNotFound(id.clone()))
        }

        async fn resolve_playable_url(&self, storage_path: &str) -> Result<String> {
            Ok(format!("memory://{}", storage_path))
        }

        async fn record_uploaded_track(&self, title: &str, storage_path: &str) -> Result<Track> {
            let url = self.resolve_playable_url(storage_path).await?;
            let mut tracks = self.tracks.lock().map_err(|e| RetroError::Other(e.to_string()))?;
            let track = Track::new(TrackId::from(tracks.len() as i64 + 1), title, "", url);
            tracks.push(track.clone());
            Ok(track)
        }

        async fn update_track_duration(&self, id: &TrackId, duration_secs: f64) -> Result<()> {
            let mut tracks = self.tracks.lock().map_err(|e| RetroError::Other(e.to_string()))?;
            let track = tracks
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| RetroError::TrackNotFound(id.clone()))?;
            track.set_duration(duration_secs);
            Ok(())
        }
    }

    #[tokio::test]
    async fn catalog_is_object_safe_and_lists_newest_first() {
        let catalog: Box<dyn TrackCatalog> = Box::<MemoryCatalog>::default();

        catalog.record_uploaded_track("Skyfall", "skyfall.opus").await.unwrap();
        let second = catalog
            .record_uploaded_track("Plastic Love", "plastic-love.mp3")
            .await
            .unwrap();
        assert!(!second.has_known_duration());

        catalog.update_track_duration(&second.id, 293.0).await.unwrap();

        let titles: Vec<_> = catalog
            .list_tracks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.title, t.duration_secs))
            .collect();
        assert_eq!(
            titles,
            vec![("Plastic Love".to_string(), 293.0), ("Skyfall".to_string(), 0.0)]
        );

        let missing = catalog.get_track(&TrackId::new("99")).await.unwrap_err();
        assert!(matches!(missing, RetroError::TrackNotFound(_)));
    }
}
