//! Retro Rhythm - Playback Control
//!
//! Platform-agnostic playback controller for Retro Rhythm.
//!
//! This crate provides:
//! - Transport state machine (Idle, Loading, Playing, Paused, Ended, Errored)
//! - Volume control (0.0-1.0, mute preserving the level)
//! - Playlist navigation (wrap-around next, restart-or-back previous)
//! - Advance on track end, stop or loop at the end of the playlist
//! - Spacebar play/pause binding
//! - Best-effort duration preloading
//! - View helpers (time labels, status labels, playlist rows)
//!
//! # Architecture
//!
//! `retro-playback` does not talk to any audio API. A platform provides an
//! [`AudioBackend`] that hands out one [`AudioResource`] per binding and
//! reports the resource's callbacks back as [`MediaEvent`]s. The `wasm`
//! feature ships such a backend built on `HTMLAudioElement`.
//!
//! # Example
//!
//! ```rust
//! use retro_core::{Playlist, Track, TrackId};
//! use retro_playback::{
//!     AudioBackend, AudioResource, BindingId, ControllerConfig, MediaEvent, PlaybackController,
//!     PlaybackStatus, Result,
//! };
//!
//! struct Silent;
//!
//! impl AudioResource for Silent {
//!     fn request_play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position_secs: f64) {}
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn release(&mut self) {}
//! }
//!
//! struct SilentBackend;
//!
//! impl AudioBackend for SilentBackend {
//!     type Resource = Silent;
//!
//!     fn acquire(&mut self, _binding: BindingId, _locator: &str) -> Result<Silent> {
//!         Ok(Silent)
//!     }
//! }
//!
//! let playlist = Playlist::new(vec![Track::new(
//!     TrackId::new("1"),
//!     "Fly-Day Chinatown",
//!     "Yasuha",
//!     "https://example.com/fly-day.mp3",
//! )]);
//!
//! let mut player =
//!     PlaybackController::with_playlist(SilentBackend, ControllerConfig::default(), playlist, 0)?;
//!
//! // The platform reports readiness
//! let binding = player.current_binding().unwrap();
//! player.handle_media_event(binding, MediaEvent::CanPlay);
//! assert_eq!(player.status(), PlaybackStatus::Paused);
//!
//! player.toggle_play()?;
//! assert_eq!(player.status(), PlaybackStatus::Playing);
//! # Ok::<(), retro_playback::PlaybackError>(())
//! ```

mod controller;
mod error;
mod events;
pub mod keyboard;
pub mod media;
pub mod preload;
pub mod types;
pub mod view;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use controller::{ListenerId, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use keyboard::KeyResponse;
pub use media::{AudioBackend, AudioResource, BindingId, MediaEvent, PlayRejection, ResourceGuard};
pub use preload::{
    fetch_playlist, pending_probes, preload_durations, probe_pending, DurationProbe, PendingProbe,
    PreloadReport,
};
pub use types::{ControllerConfig, EndOfPlaylist, PlaybackStatus};
pub use view::PlayerSnapshot;
pub use volume::Volume;
