//! Playback controller - transport state machine
//!
//! Owns the bound playlist, the single live audio resource and the transport
//! state. Platform callbacks enter through [`PlaybackController::handle_media_event`];
//! views observe through events and [`PlaybackController::snapshot`].

use crate::{
    error::{PlaybackError, Result},
    events::PlayerEvent,
    keyboard::{self, KeyResponse},
    media::{AudioBackend, AudioResource, BindingId, MediaEvent, PlayRejection, ResourceGuard},
    types::{ControllerConfig, EndOfPlaylist, PlaybackStatus},
    view::PlayerSnapshot,
    volume::Volume,
};
use retro_core::{Playlist, Track, TrackId};
use tracing::{debug, warn};

/// Handle for a registered event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&PlayerEvent)>;

/// Playlist-aware playback controller
///
/// Single-threaded: drive it from the UI thread and feed it the facility's
/// callbacks as [`MediaEvent`]s. Dropping the controller releases the bound
/// audio resource.
pub struct PlaybackController<B: AudioBackend> {
    config: ControllerConfig,
    backend: B,
    playlist: Playlist,
    current_index: usize,
    status: PlaybackStatus,
    position_secs: f64,

    // Duration reported by the bound resource; overrides the track placeholder
    reported_duration: Option<f64>,
    volume: Volume,
    resource: Option<ResourceGuard<B::Resource>>,
    bound_track_id: Option<TrackId>,
    next_binding: u64,

    // An explicit or automatic play request is outstanding
    play_intent: bool,

    // Event queue, used while nobody is subscribed
    pending_events: Vec<PlayerEvent>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<B: AudioBackend> PlaybackController<B> {
    /// Create an idle controller with an empty playlist
    pub fn new(backend: B, config: ControllerConfig) -> Self {
        Self {
            volume: Volume::new(config.initial_volume),
            config,
            backend,
            playlist: Playlist::default(),
            current_index: 0,
            status: PlaybackStatus::Idle,
            position_secs: 0.0,
            reported_duration: None,
            resource: None,
            bound_track_id: None,
            next_binding: 1,
            play_intent: false,
            pending_events: Vec::new(),
            listeners: Vec::new(),
            next_listener: 1,
        }
    }

    /// Create a controller bound to `playlist` at `start`
    pub fn with_playlist(
        backend: B,
        config: ControllerConfig,
        playlist: Playlist,
        start: usize,
    ) -> Result<Self> {
        let mut controller = Self::new(backend, config);
        controller.bind_playlist(playlist, start)?;
        Ok(controller)
    }

    // ===== Binding =====

    /// Bind a playlist and load the track at `start`
    ///
    /// Any previously bound resource is released first. Playback starts only
    /// if `auto_play` is configured.
    pub fn bind_playlist(&mut self, playlist: Playlist, start: usize) -> Result<()> {
        if playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        if start >= playlist.len() {
            return Err(PlaybackError::IndexOutOfBounds(start));
        }

        self.resource = None;
        self.playlist = playlist;
        self.bind_index(start, self.config.auto_play);
        Ok(())
    }

    /// Release the audio resource and return to `Idle`
    ///
    /// The playlist and index are kept, so a later `play()` rebinds the same
    /// track.
    pub fn unbind(&mut self) {
        self.resource = None;
        self.bound_track_id = None;
        self.play_intent = false;
        self.position_secs = 0.0;
        self.reported_duration = None;
        self.set_status(PlaybackStatus::Idle);
    }

    /// Fill in a probed duration for the row at `index`
    ///
    /// Ignored when the row no longer holds `track_id` (the playlist was
    /// rebound), already has a duration, or `duration_secs` is unusable.
    /// Returns whether the row changed.
    pub fn set_track_duration(
        &mut self,
        index: usize,
        track_id: &TrackId,
        duration_secs: f64,
    ) -> bool {
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            return false;
        }
        let Some(track) = self
            .playlist
            .get_mut(index)
            .filter(|t| &t.id == track_id && !t.has_known_duration())
        else {
            debug!(index, track = %track_id, "Dropping probed duration for stale row");
            return false;
        };

        track.set_duration(duration_secs);
        self.emit(PlayerEvent::TrackDurationKnown {
            index,
            track_id: track_id.clone(),
            duration_secs,
        });
        true
    }

    // ===== Transport =====

    /// Start or resume playback
    ///
    /// The outcome may still be refused asynchronously by the host; see
    /// [`MediaEvent::PlayRejected`].
    pub fn play(&mut self) -> Result<()> {
        match self.status {
            PlaybackStatus::Playing => {}
            PlaybackStatus::Loading => {
                if !self.play_intent {
                    self.play_intent = true;
                    if let Some(resource) = self.resource.as_mut() {
                        resource.request_play();
                    }
                }
            }
            PlaybackStatus::Paused | PlaybackStatus::Ended => {
                self.play_intent = true;
                if let Some(resource) = self.resource.as_mut() {
                    resource.request_play();
                }
                self.set_status(PlaybackStatus::Playing);
            }
            PlaybackStatus::Idle => {
                if self.playlist.is_empty() {
                    return Err(PlaybackError::EmptyPlaylist);
                }
                self.bind_index(self.current_index, true);
            }
            PlaybackStatus::Errored => {
                debug!(
                    track = ?self.bound_track_id,
                    "Ignoring play: current track failed to load"
                );
            }
        }
        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        match self.status {
            PlaybackStatus::Playing => {
                self.play_intent = false;
                if let Some(resource) = self.resource.as_mut() {
                    resource.pause();
                }
                self.set_status(PlaybackStatus::Paused);
            }
            PlaybackStatus::Loading if self.play_intent => {
                // Cancels the in-flight request; readiness will land in Paused
                self.play_intent = false;
                if let Some(resource) = self.resource.as_mut() {
                    resource.pause();
                }
            }
            _ => {}
        }
    }

    /// Pause when playing (or about to), play otherwise
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.wants_playback() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Jump to `position_secs`
    ///
    /// Clamped to `[0, duration]`; only the lower bound applies while the
    /// duration is unknown. Ignored when no resource is bound.
    pub fn seek(&mut self, position_secs: f64) {
        if self.resource.is_none() {
            debug!("Ignoring seek: no track bound");
            return;
        }
        let Some(target) = self.clamp_position(position_secs) else {
            debug!(position_secs, "Ignoring seek to unusable position");
            return;
        };

        if let Some(resource) = self.resource.as_mut() {
            resource.seek(target);
        }
        self.position_secs = target;
        self.emit(PlayerEvent::PositionChanged {
            position_secs: target,
        });
    }

    // ===== Volume =====

    /// Set volume, clamped to `[0.0, 1.0]`
    ///
    /// Does not unmute; a muted player stays silent and remembers the level.
    pub fn set_volume(&mut self, volume: f32) {
        if !self.volume.set_level(volume) {
            debug!(volume, "Ignoring non-finite volume");
            return;
        }
        self.apply_volume();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    /// Set the mute flag
    pub fn set_muted(&mut self, muted: bool) {
        self.volume.set_muted(muted);
        self.apply_volume();
    }

    // ===== Navigation =====

    /// Move to the next track, wrapping to the first
    ///
    /// Keeps playing if playback was active, stays paused otherwise.
    pub fn next_track(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(PlaybackError::EmptyPlaylist);
        }

        let index = (self.current_index + 1) % len;
        let resume = self.wants_playback();
        self.bind_index(index, resume);
        Ok(())
    }

    /// Restart the track, or move to the previous one
    ///
    /// Past `restart_threshold_secs` the current track restarts. Otherwise the
    /// previous track is bound, wrapping from the first to the last.
    pub fn previous_track(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            return Err(PlaybackError::EmptyPlaylist);
        }

        if self.resource.is_some() && self.position_secs > self.config.restart_threshold_secs {
            self.seek(0.0);
            return Ok(());
        }

        let index = if self.current_index == 0 {
            len - 1
        } else {
            self.current_index - 1
        };
        let resume = self.wants_playback();
        self.bind_index(index, resume);
        Ok(())
    }

    /// Jump to `index` and start playing it
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.bind_index(index, true);
        Ok(())
    }

    // ===== Input =====

    /// Offer a key press; the spacebar toggles playback
    pub fn handle_key(&mut self, code: &str, key: &str) -> KeyResponse {
        if !keyboard::is_play_toggle(code, key) {
            return KeyResponse::Ignored;
        }
        if let Err(e) = self.toggle_play() {
            debug!(error = %e, "Spacebar toggle had nothing to play");
        }
        KeyResponse::Handled
    }

    /// Apply a callback from the audio facility
    ///
    /// Events tagged with anything but the live binding are dropped.
    pub fn handle_media_event(&mut self, binding: BindingId, event: MediaEvent) {
        if self.current_binding() != Some(binding) {
            debug!(%binding, ?event, "Dropping event from released resource");
            return;
        }

        match event {
            MediaEvent::MetadataLoaded { duration_secs } => self.on_metadata(duration_secs),
            MediaEvent::CanPlay => {
                if self.status == PlaybackStatus::Loading {
                    let status = if self.play_intent {
                        PlaybackStatus::Playing
                    } else {
                        PlaybackStatus::Paused
                    };
                    self.set_status(status);
                }
            }
            MediaEvent::PlayStarted => {
                if self.status == PlaybackStatus::Loading && self.play_intent {
                    self.set_status(PlaybackStatus::Playing);
                }
            }
            MediaEvent::PlayRejected { reason } => self.on_play_rejected(reason),
            MediaEvent::TimeUpdate { position_secs } => self.on_time_update(position_secs),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::LoadFailed { message } => self.on_load_failed(message),
        }
    }

    // ===== Observers =====

    /// Register a listener; events stop queuing while any are registered
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&PlayerEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Drain all queued events
    ///
    /// Events are queued only while no listener is subscribed.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are queued events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Current observable state
    pub fn snapshot(&self) -> PlayerSnapshot {
        let current = self.current_track();
        PlayerSnapshot {
            status: self.status,
            position_secs: self.position_secs,
            duration_secs: self.duration_secs(),
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            effective_volume: self.volume.effective(),
            current_track_index: current.map(|_| self.current_index),
            current_track_id: current.map(|t| t.id.clone()),
        }
    }

    // ===== State Queries =====

    /// Transport status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Position in seconds
    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    /// Duration in seconds, 0 while unknown
    pub fn duration_secs(&self) -> f64 {
        self.known_duration().unwrap_or(0.0)
    }

    /// Stored volume level
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Audible volume
    pub fn effective_volume(&self) -> f32 {
        self.volume.effective()
    }

    /// Index of the current track, `None` for an empty playlist
    pub fn current_index(&self) -> Option<usize> {
        self.current_track().map(|_| self.current_index)
    }

    /// Current track
    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.current_index)
    }

    /// Bound playlist
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Controller configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Audio backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Binding of the live resource
    pub fn current_binding(&self) -> Option<BindingId> {
        self.resource.as_ref().map(ResourceGuard::binding)
    }

    /// Whether a play request is outstanding
    pub fn is_play_requested(&self) -> bool {
        self.play_intent
    }

    // ===== Internal =====

    fn wants_playback(&self) -> bool {
        match self.status {
            PlaybackStatus::Playing => true,
            PlaybackStatus::Loading => self.play_intent,
            _ => false,
        }
    }

    fn known_duration(&self) -> Option<f64> {
        self.reported_duration.or_else(|| {
            self.current_track()
                .filter(|t| t.has_known_duration())
                .map(|t| t.duration_secs)
        })
    }

    fn clamp_position(&self, position_secs: f64) -> Option<f64> {
        if position_secs.is_nan() {
            return None;
        }
        let lower = position_secs.max(0.0);
        let clamped = match self.known_duration() {
            Some(duration) => lower.min(duration),
            None => lower,
        };
        clamped.is_finite().then_some(clamped)
    }

    /// Release the old resource, then acquire one for `index`
    fn bind_index(&mut self, index: usize, play: bool) {
        let Some(track) = self.playlist.get(index) else {
            warn!(index, "Cannot bind track: index out of range");
            return;
        };
        let track_id = track.id.clone();
        let locator = track.source_url.clone();

        self.resource = None;
        self.current_index = index;
        self.position_secs = 0.0;
        self.reported_duration = None;
        self.play_intent = play;

        let binding = BindingId::new(self.next_binding);
        self.next_binding += 1;

        let previous_track_id = self.bound_track_id.replace(track_id.clone());
        self.emit(PlayerEvent::TrackChanged {
            index,
            track_id: track_id.clone(),
            previous_track_id,
        });

        match self.backend.acquire(binding, &locator) {
            Ok(resource) => {
                let mut guard = ResourceGuard::new(binding, resource);
                guard.set_volume(self.volume.effective());
                if play {
                    guard.request_play();
                }
                self.resource = Some(guard);
                debug!(%binding, track = %track_id, index, play, "Bound track");
                self.set_status(PlaybackStatus::Loading);
            }
            Err(e) => {
                warn!(track = %track_id, error = %e, "Failed to acquire audio resource");
                self.play_intent = false;
                self.set_status(PlaybackStatus::Errored);
                self.emit_error(Some(track_id), e.to_string());
            }
        }
    }

    fn apply_volume(&mut self) {
        let effective = self.volume.effective();
        if let Some(resource) = self.resource.as_mut() {
            resource.set_volume(effective);
        }
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            effective,
        });
    }

    fn fall_back_to_paused(&mut self) {
        self.play_intent = false;
        if let Some(resource) = self.resource.as_mut() {
            resource.pause();
        }
        self.set_status(PlaybackStatus::Paused);
    }

    fn on_metadata(&mut self, duration_secs: f64) {
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            debug!(duration_secs, "Ignoring unusable reported duration");
            return;
        }

        self.reported_duration = Some(duration_secs);
        if let Some(track) = self.playlist.get_mut(self.current_index) {
            track.set_duration(duration_secs);
        }
        if self.position_secs > duration_secs {
            self.position_secs = duration_secs;
        }
        self.emit(PlayerEvent::DurationKnown { duration_secs });
    }

    fn on_time_update(&mut self, position_secs: f64) {
        let Some(position) = self.clamp_position(position_secs) else {
            return;
        };
        if position != self.position_secs {
            self.position_secs = position;
            self.emit(PlayerEvent::PositionChanged {
                position_secs: position,
            });
        }
    }

    fn on_play_rejected(&mut self, reason: PlayRejection) {
        let outstanding = self.wants_playback();

        match reason {
            PlayRejection::Aborted => debug!("Play request aborted"),
            other if !outstanding => {
                debug!(rejection = ?other, "Ignoring rejection of a withdrawn play request");
            }
            PlayRejection::PolicyDenied => {
                warn!(track = ?self.bound_track_id, "Playback blocked by autoplay policy");
                self.fall_back_to_paused();
                if let Some(track_id) = self.bound_track_id.clone() {
                    self.emit(PlayerEvent::PlaybackBlocked {
                        track_id,
                        message: PlaybackError::PolicyDenied.to_string(),
                    });
                }
            }
            PlayRejection::Other(detail) => {
                warn!(track = ?self.bound_track_id, %detail, "Play request rejected");
                self.fall_back_to_paused();
                self.emit_error(
                    self.bound_track_id.clone(),
                    PlaybackError::PlayFailed(detail).to_string(),
                );
            }
        }
    }

    fn on_ended(&mut self) {
        let Some(track_id) = self.bound_track_id.clone() else {
            return;
        };
        // A paused element scrubbed to its end also fires `ended`
        let resume = self.wants_playback();

        self.set_status(PlaybackStatus::Ended);
        self.emit(PlayerEvent::TrackFinished { track_id });

        let has_next = self.current_index + 1 < self.playlist.len();
        if self.config.advance_on_end && has_next {
            self.bind_index(self.current_index + 1, resume);
        } else if self.config.advance_on_end && self.config.end_of_playlist == EndOfPlaylist::Loop
        {
            self.bind_index(0, resume);
        } else {
            self.play_intent = false;
            self.position_secs = 0.0;
            if let Some(resource) = self.resource.as_mut() {
                resource.pause();
                resource.seek(0.0);
            }
            self.emit(PlayerEvent::PositionChanged { position_secs: 0.0 });
            self.set_status(PlaybackStatus::Paused);
        }
    }

    fn on_load_failed(&mut self, message: String) {
        warn!(track = ?self.bound_track_id, %message, "Audio resource failed to load");
        self.resource = None;
        self.play_intent = false;
        self.set_status(PlaybackStatus::Errored);
        self.emit_error(
            self.bound_track_id.clone(),
            PlaybackError::ResourceLoad(message).to_string(),
        );
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            debug!(from = ?self.status, to = ?status, "Transport status changed");
            self.status = status;
            self.emit(PlayerEvent::StatusChanged { status });
        }
    }

    fn emit_error(&mut self, track_id: Option<TrackId>, message: String) {
        self.emit(PlayerEvent::Error { track_id, message });
    }

    fn emit(&mut self, event: PlayerEvent) {
        if self.listeners.is_empty() {
            self.pending_events.push(event);
            return;
        }
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}
