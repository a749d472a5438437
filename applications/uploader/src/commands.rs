/// Command implementations
use crate::config::UploaderConfig;
use crate::error::{Result, UploaderError};
use retro_backend::{mime_type_for_file, SupabaseClient, UploadPipeline, UploadProgress, UploadStage};
use retro_core::{Track, TrackCatalog, TrackId};
use retro_playback::view::format_time;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of an `upload` run
#[derive(Debug, Default)]
pub struct UploadSummary {
    pub uploaded: Vec<Track>,
    pub failed: Vec<(PathBuf, String)>,
}

impl UploadSummary {
    /// Error when any file failed
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(UploaderError::UploadsFailed {
                failed: self.failed.len(),
                total: self.failed.len() + self.uploaded.len(),
            })
        }
    }
}

/// Build a client and sign in when credentials are configured
pub async fn connect(config: &UploaderConfig) -> Result<SupabaseClient> {
    config.validate()?;
    let client = SupabaseClient::new(config.backend())?;

    if let Some((email, password)) = config.credentials() {
        client.sign_in(email, password).await?;
    } else {
        debug!("No credentials configured, using anon key");
    }
    Ok(client)
}

/// Upload files (directories contribute their audio files)
pub async fn upload(client: &SupabaseClient, inputs: &[PathBuf]) -> Result<UploadSummary> {
    let paths = expand_inputs(inputs)?;
    if paths.is_empty() {
        warn!("No audio files to upload");
        return Ok(UploadSummary::default());
    }

    info!(files = paths.len(), "Uploading");
    let pipeline = UploadPipeline::new(client.storage(), client.catalog());
    let outcomes = pipeline.ingest_paths(paths, report_progress).await;

    let mut summary = UploadSummary::default();
    for outcome in outcomes {
        match outcome.result {
            Ok(track) => summary.uploaded.push(track),
            Err(e) => summary.failed.push((outcome.path, e.to_string())),
        }
    }

    info!(
        uploaded = summary.uploaded.len(),
        failed = summary.failed.len(),
        "Upload finished"
    );
    Ok(summary)
}

/// Catalog listing, one line per track
pub async fn list(client: &SupabaseClient) -> Result<Vec<String>> {
    let tracks = client.catalog().list_tracks().await?;
    Ok(tracks.iter().map(track_line).collect())
}

/// Store a duration measured elsewhere
pub async fn set_duration(client: &SupabaseClient, id: &str, secs: f64) -> Result<()> {
    client
        .catalog()
        .update_track_duration(&TrackId::new(id), secs)
        .await?;
    info!(track = id, secs, "Duration updated");
    Ok(())
}

/// `[id] title - artist (MM:SS)`; unknown durations show `--:--`
pub fn track_line(track: &Track) -> String {
    let duration = if track.has_known_duration() {
        format_time(track.duration_secs)
    } else {
        "--:--".to_string()
    };

    if track.artist.is_empty() {
        format!("[{}] {} ({})", track.id, track.title, duration)
    } else {
        format!(
            "[{}] {} - {} ({})",
            track.id, track.title, track.artist, duration
        )
    }
}

/// Files as given; directories expand to their audio files, sorted by name
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_audio_file(path))
                .collect();
            entries.sort();
            debug!(dir = %input.display(), files = entries.len(), "Expanded directory");
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }

    Ok(paths)
}

fn is_audio_file(path: &Path) -> bool {
    mime_type_for_file(path) != "application/octet-stream"
}

fn report_progress(progress: UploadProgress) {
    let position = progress.file_index + 1;
    match progress.stage {
        UploadStage::Uploading => info!(
            "[{}/{}] Uploading {}",
            position, progress.total_files, progress.current_file
        ),
        UploadStage::Done => info!(
            "[{}/{}] Uploaded {}",
            position, progress.total_files, progress.current_file
        ),
        UploadStage::Failed => warn!(
            "[{}/{}] Failed {}",
            position, progress.total_files, progress.current_file
        ),
    }
}
