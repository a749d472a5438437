//! Best-effort duration preloading for library playlists
//!
//! Every track still carrying the 0 placeholder is probed once. A failed
//! probe is logged and leaves the placeholder; it never stops the others.
//! Players bind first and feed results in through
//! [`PlaybackController::set_track_duration`](crate::PlaybackController::set_track_duration).

use crate::error::Result;
use async_trait::async_trait;
use retro_core::{Playlist, TrackCatalog, TrackId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Loads just enough of a resource to read its duration
#[async_trait(?Send)]
pub trait DurationProbe {
    /// Duration of the resource at `locator`, in seconds
    async fn probe_duration(&self, locator: &str) -> Result<f64>;
}

/// Outcome of a preload pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadReport {
    /// Tracks whose duration was filled in
    pub probed: usize,
    /// Tracks that already had a duration
    pub skipped: usize,
    /// Tracks whose probe failed
    pub failed: Vec<TrackId>,
}

/// A track still carrying the 0 duration placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingProbe {
    /// Playlist slot
    pub index: usize,
    /// Track to fill in
    pub track_id: TrackId,
    /// Resource to probe
    pub locator: String,
}

/// Tracks with an unknown duration, in playlist order
pub fn pending_probes(playlist: &Playlist) -> Vec<PendingProbe> {
    playlist
        .iter()
        .enumerate()
        .filter(|(_, track)| !track.has_known_duration())
        .map(|(index, track)| PendingProbe {
            index,
            track_id: track.id.clone(),
            locator: track.source_url.clone(),
        })
        .collect()
}

/// Probe one track; `None` when the probe failed or the duration is unusable
pub async fn probe_pending<P>(probe: &P, pending: &PendingProbe) -> Option<f64>
where
    P: DurationProbe + ?Sized,
{
    match probe.probe_duration(&pending.locator).await {
        Ok(secs) if secs.is_finite() && secs > 0.0 => {
            debug!(track = %pending.track_id, duration_secs = secs, "Probed duration");
            Some(secs)
        }
        Ok(secs) => {
            warn!(
                track = %pending.track_id,
                duration_secs = secs,
                "Probe returned unusable duration"
            );
            None
        }
        Err(e) => {
            warn!(track = %pending.track_id, error = %e, "Failed to probe duration");
            None
        }
    }
}

/// Probe every track with an unknown duration, in order
pub async fn preload_durations<P>(playlist: &mut Playlist, probe: &P) -> PreloadReport
where
    P: DurationProbe + ?Sized,
{
    let pending = pending_probes(playlist);
    let mut report = PreloadReport {
        skipped: playlist.len() - pending.len(),
        ..PreloadReport::default()
    };

    for item in &pending {
        match probe_pending(probe, item).await {
            Some(secs) => {
                if let Some(track) = playlist.get_mut(item.index) {
                    track.set_duration(secs);
                }
                report.probed += 1;
            }
            None => report.failed.push(item.track_id.clone()),
        }
    }

    report
}

/// Fetch the catalog as a playlist, newest first
pub async fn fetch_playlist<C>(catalog: &C) -> Result<Playlist>
where
    C: TrackCatalog + ?Sized,
{
    let tracks = catalog.list_tracks().await?;
    debug!(count = tracks.len(), "Fetched track catalog");
    Ok(Playlist::new(tracks))
}
