//! Track catalog over the PostgREST tracks table.

use crate::client::{authorize, check_status, Connection};
use crate::error::{BackendError, Result};
use crate::storage::public_object_url;
use crate::types::{BackendConfig, DurationPatch, NewTrackRow, TrackRow};
use async_trait::async_trait;
use retro_core::{RetroError, Track, TrackCatalog, TrackId};
use tracing::{debug, info};

/// Catalog client for the configured tracks table.
#[derive(Debug, Clone)]
pub struct SupabaseCatalog {
    conn: Connection,
}

impl SupabaseCatalog {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// All rows, newest first.
    pub async fn fetch_rows(&self) -> Result<Vec<TrackRow>> {
        let config = self.conn.snapshot().await;
        let url = table_url(&config);
        debug!(url = %url, "Fetching track rows");

        let request = self
            .conn
            .http
            .get(&url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = authorize(request, &config)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let rows: Vec<TrackRow> = check_status(response).await?.json().await.map_err(|e| {
            BackendError::ParseError(format!("Failed to parse track rows: {}", e))
        })?;

        debug!(rows = rows.len(), "Fetched track rows");
        Ok(rows)
    }

    /// One row by id.
    pub async fn fetch_row(&self, id: &TrackId) -> Result<TrackRow> {
        let config = self.conn.snapshot().await;
        let url = table_url(&config);
        let filter = format!("eq.{}", id);

        let request = self
            .conn
            .http
            .get(&url)
            .query(&[("select", "*"), ("id", filter.as_str())]);
        let response = authorize(request, &config)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let rows: Vec<TrackRow> = check_status(response).await?.json().await.map_err(|e| {
            BackendError::ParseError(format!("Failed to parse track row: {}", e))
        })?;

        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("track {}", id)))
    }

    /// Insert a row with the 0 duration placeholder.
    pub async fn insert_row(&self, title: &str, file_path: &str) -> Result<TrackRow> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BackendError::InvalidInput("track title cannot be empty".into()));
        }

        let config = self.conn.snapshot().await;
        let url = table_url(&config);
        let body = [NewTrackRow {
            title,
            file_path,
            duration: 0.0,
        }];

        let request = self
            .conn
            .http
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&body);
        let response = authorize(request, &config)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let rows: Vec<TrackRow> = check_status(response).await?.json().await.map_err(|e| {
            BackendError::ParseError(format!("Failed to parse inserted row: {}", e))
        })?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::ParseError("insert returned no rows".into()))?;

        info!(title = %row.title, file_path = %row.file_path, "Track recorded");
        Ok(row)
    }

    /// Persist a probed duration.
    pub async fn patch_duration(&self, id: &TrackId, duration_secs: f64) -> Result<()> {
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            return Err(BackendError::InvalidInput(format!(
                "unusable duration {}",
                duration_secs
            )));
        }

        let config = self.conn.snapshot().await;
        let url = table_url(&config);
        let filter = format!("eq.{}", id);

        let request = self
            .conn
            .http
            .patch(&url)
            .query(&[("id", filter.as_str())])
            .json(&DurationPatch {
                duration: duration_secs,
            });
        let response = authorize(request, &config)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        check_status(response).await?;
        debug!(track = %id, duration_secs, "Duration stored");
        Ok(())
    }

    fn to_track(row: TrackRow, config: &BackendConfig) -> Result<Track> {
        let source_url = public_object_url(&config.url, &config.bucket, &row.file_path)?;
        let track = Track::new(
            row.id.into(),
            row.title,
            row.artist.unwrap_or_default(),
            source_url,
        );
        Ok(track.with_duration(row.duration.unwrap_or(0.0)))
    }
}

#[async_trait]
impl TrackCatalog for SupabaseCatalog {
    async fn list_tracks(&self) -> retro_core::Result<Vec<Track>> {
        let rows = self.fetch_rows().await.map_err(catalog_error)?;
        let config = self.conn.snapshot().await;
        rows.into_iter()
            .map(|row| Self::to_track(row, &config).map_err(catalog_error))
            .collect()
    }

    async fn get_track(&self, id: &TrackId) -> retro_core::Result<Track> {
        let row = self.fetch_row(id).await.map_err(|e| match e {
            BackendError::NotFound(_) => RetroError::TrackNotFound(id.clone()),
            other => catalog_error(other),
        })?;
        let config = self.conn.snapshot().await;
        Self::to_track(row, &config).map_err(catalog_error)
    }

    async fn resolve_playable_url(&self, storage_path: &str) -> retro_core::Result<String> {
        let config = self.conn.snapshot().await;
        public_object_url(&config.url, &config.bucket, storage_path).map_err(catalog_error)
    }

    async fn record_uploaded_track(
        &self,
        title: &str,
        storage_path: &str,
    ) -> retro_core::Result<Track> {
        let row = self
            .insert_row(title, storage_path)
            .await
            .map_err(catalog_error)?;
        let config = self.conn.snapshot().await;
        Self::to_track(row, &config).map_err(catalog_error)
    }

    async fn update_track_duration(
        &self,
        id: &TrackId,
        duration_secs: f64,
    ) -> retro_core::Result<()> {
        self.patch_duration(id, duration_secs)
            .await
            .map_err(catalog_error)
    }
}

fn table_url(config: &BackendConfig) -> String {
    format!("{}/rest/v1/{}", config.url, config.tracks_table)
}

fn catalog_error(error: BackendError) -> RetroError {
    match error {
        BackendError::ServerError { .. }
        | BackendError::ParseError(_)
        | BackendError::NotFound(_)
        | BackendError::InvalidUrl(_) => RetroError::catalog(error.to_string()),
        other => other.into(),
    }
}
