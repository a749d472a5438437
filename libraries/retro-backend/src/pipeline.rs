//! Upload-then-record pipeline for local audio files.

use crate::types::{UploadProgress, UploadStage};
use retro_core::{AudioStorage, RetroError, Track, TrackCatalog};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Uploads audio files and records them in the catalog.
pub struct UploadPipeline<S, C> {
    storage: S,
    catalog: C,
}

/// Result of one file in a batch.
#[derive(Debug)]
pub struct UploadOutcome {
    pub path: PathBuf,
    pub result: retro_core::Result<Track>,
}

impl<S, C> UploadPipeline<S, C>
where
    S: AudioStorage,
    C: TrackCatalog,
{
    /// Create a pipeline over a storage and a catalog.
    pub fn new(storage: S, catalog: C) -> Self {
        Self { storage, catalog }
    }

    /// Upload `bytes` as `file_name`, then insert a track row for it.
    ///
    /// The title is the file name without its extension, underscores read
    /// as spaces.
    pub async fn ingest(&self, bytes: Vec<u8>, file_name: &str) -> retro_core::Result<Track> {
        let title = title_from_file_name(file_name);
        if title.is_empty() {
            return Err(RetroError::invalid_input(format!(
                "cannot derive a title from {:?}",
                file_name
            )));
        }

        let content_type = mime_type_for_file(Path::new(file_name));
        let storage_path = self
            .storage
            .upload_file(bytes, file_name, content_type)
            .await?;
        let track = self
            .catalog
            .record_uploaded_track(&title, &storage_path)
            .await?;

        info!(track = %track.id, title = %track.title, "Track ingested");
        Ok(track)
    }

    /// Ingest files one after another.
    ///
    /// A failing file is reported and the batch moves on.
    pub async fn ingest_paths<F>(&self, paths: Vec<PathBuf>, mut progress: F) -> Vec<UploadOutcome>
    where
        F: FnMut(UploadProgress),
    {
        let total_files = paths.len();
        let mut outcomes = Vec::with_capacity(total_files);

        for (file_index, path) in paths.into_iter().enumerate() {
            let current_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            progress(UploadProgress {
                file_index,
                total_files,
                current_file: current_file.clone(),
                stage: UploadStage::Uploading,
            });

            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => self.ingest(bytes, &current_file).await,
                Err(e) => Err(RetroError::Io(e)),
            };

            let stage = match &result {
                Ok(_) => UploadStage::Done,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Upload failed");
                    UploadStage::Failed
                }
            };
            progress(UploadProgress {
                file_index,
                total_files,
                current_file,
                stage,
            });

            outcomes.push(UploadOutcome { path, result });
        }

        outcomes
    }
}

/// `Anuv_Jain - Alag_Aasmaan.mp3` → `Anuv Jain - Alag Aasmaan`
pub fn title_from_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    stem.replace('_', " ").trim().to_string()
}

/// Get MIME type for audio file.
pub fn mime_type_for_file(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("wav") => "audio/wav",
        Some("m4a" | "aac") => "audio/mp4",
        _ => "application/octet-stream",
    }
}
