//! Scripted audio backend shared by the integration tests

#![allow(dead_code)]

use retro_core::{Playlist, Track, TrackId};
use retro_playback::{
    AudioBackend, AudioResource, BindingId, ControllerConfig, MediaEvent, PlaybackController,
    PlaybackError, PlayerEvent, Result,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Everything the controller asked of its resources
#[derive(Debug, Default)]
pub struct ResourceLog {
    pub acquired: Vec<(BindingId, String)>,
    pub released: Vec<BindingId>,
    pub play_requests: usize,
    pub pauses: usize,
    pub seeks: Vec<f64>,
    pub volume: Option<f32>,
    /// Whether the live resource is currently asked to render
    pub requesting: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    pub log: Rc<RefCell<ResourceLog>>,
    failing: Rc<RefCell<HashSet<String>>>,
}

impl MockBackend {
    /// Make `acquire` fail for this locator
    pub fn fail_locator(&self, locator: &str) {
        self.failing.borrow_mut().insert(locator.to_string());
    }
}

pub struct MockResource {
    binding: BindingId,
    log: Rc<RefCell<ResourceLog>>,
}

impl AudioResource for MockResource {
    fn request_play(&mut self) {
        let mut log = self.log.borrow_mut();
        log.play_requests += 1;
        log.requesting = true;
    }

    fn pause(&mut self) {
        let mut log = self.log.borrow_mut();
        log.pauses += 1;
        log.requesting = false;
    }

    fn seek(&mut self, position_secs: f64) {
        self.log.borrow_mut().seeks.push(position_secs);
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().volume = Some(volume);
    }

    fn release(&mut self) {
        let mut log = self.log.borrow_mut();
        log.requesting = false;
        log.released.push(self.binding);
    }
}

impl AudioBackend for MockBackend {
    type Resource = MockResource;

    fn acquire(&mut self, binding: BindingId, locator: &str) -> Result<MockResource> {
        if self.failing.borrow().contains(locator) {
            return Err(PlaybackError::ResourceLoad(format!(
                "unsupported source: {}",
                locator
            )));
        }
        self.log
            .borrow_mut()
            .acquired
            .push((binding, locator.to_string()));
        Ok(MockResource {
            binding,
            log: Rc::clone(&self.log),
        })
    }
}

pub fn locator(i: usize) -> String {
    format!("https://cdn.retro.test/t{}.mp3", i)
}

/// `n` tracks with unknown durations
pub fn playlist(n: usize) -> Playlist {
    Playlist::new(
        (0..n)
            .map(|i| {
                Track::new(
                    TrackId::new(format!("t{}", i)),
                    format!("Track {}", i),
                    "Anri",
                    locator(i),
                )
            })
            .collect(),
    )
}

pub fn player_with(
    n: usize,
    config: ControllerConfig,
) -> (PlaybackController<MockBackend>, MockBackend) {
    let backend = MockBackend::default();
    let controller = PlaybackController::with_playlist(backend.clone(), config, playlist(n), 0)
        .expect("bind playlist");
    (controller, backend)
}

pub fn player(n: usize) -> (PlaybackController<MockBackend>, MockBackend) {
    player_with(n, ControllerConfig::default())
}

pub fn send(controller: &mut PlaybackController<MockBackend>, event: MediaEvent) {
    let binding = controller.current_binding().expect("bound resource");
    controller.handle_media_event(binding, event);
}

/// Metadata (200 s) plus readiness for the bound track
pub fn make_ready(controller: &mut PlaybackController<MockBackend>) {
    send(
        controller,
        MediaEvent::MetadataLoaded {
            duration_secs: 200.0,
        },
    );
    send(controller, MediaEvent::CanPlay);
}

/// Ready, play requested and confirmed
pub fn start_playing(controller: &mut PlaybackController<MockBackend>) {
    make_ready(controller);
    controller.play().expect("play");
    send(controller, MediaEvent::PlayStarted);
}

pub fn count<F>(events: &[PlayerEvent], pred: F) -> usize
where
    F: Fn(&PlayerEvent) -> bool,
{
    events.iter().filter(|e| pred(e)).count()
}

pub fn track_changes(events: &[PlayerEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            PlayerEvent::TrackChanged { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}
