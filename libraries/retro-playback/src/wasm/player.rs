//! WASM-compatible player wrapper

use super::backend::{Dispatcher, HtmlAudioBackend, SharedController};
use super::keyboard::KeyboardBinding;
use super::probe::HtmlDurationProbe;
use crate::{
    pending_probes, probe_pending, view, ControllerConfig, KeyResponse, PlaybackController,
    PlaybackError,
};
use js_sys::Function;
use retro_core::{Playlist, Track};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// JavaScript-facing Retro Rhythm player
///
/// Wraps [`PlaybackController`] over `HTMLAudioElement`s. Controller events
/// are delivered to the callback registered with `onEvent`.
#[wasm_bindgen]
pub struct WasmRetroPlayer {
    controller: SharedController,
    dispatcher: Rc<Dispatcher>,
    keyboard: Option<KeyboardBinding>,
}

#[wasm_bindgen]
impl WasmRetroPlayer {
    /// Create a player; `config` is an optional `ControllerConfig` object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmRetroPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config = if config.is_undefined() || config.is_null() {
            ControllerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid player config: {}", e)))?
        };
        Ok(Self::with_config(config))
    }

    /// Player preset for the single-source mini player
    #[wasm_bindgen(js_name = miniPlayer)]
    pub fn mini_player() -> WasmRetroPlayer {
        console_error_panic_hook::set_once();
        Self::with_config(ControllerConfig::mini_player())
    }

    // ===== Binding =====

    /// Bind `tracks` at `startIndex`, then probe unknown durations
    ///
    /// Each probe runs on its own task; a finished probe updates its row and
    /// emits `trackDurationKnown`. A stalled probe holds up nothing else.
    #[wasm_bindgen(js_name = loadPlaylist)]
    pub fn load_playlist(&self, tracks: JsValue, start_index: usize) -> Result<(), JsValue> {
        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;
        let playlist = Playlist::new(tracks);
        let pending = pending_probes(&playlist);

        self.run(|c| c.bind_playlist(playlist, start_index)).map_err(to_js)?;

        for item in pending {
            let controller = Rc::downgrade(&self.controller);
            let dispatcher = Rc::clone(&self.dispatcher);
            spawn_local(async move {
                let Some(secs) = probe_pending(&HtmlDurationProbe, &item).await else {
                    return;
                };
                let Some(controller) = controller.upgrade() else {
                    return;
                };
                let Ok(mut ctrl) = controller.try_borrow_mut() else {
                    return;
                };
                ctrl.set_track_duration(item.index, &item.track_id, secs);
                drop(ctrl);
                dispatcher.flush();
            });
        }
        Ok(())
    }

    /// Release the audio element and return to idle
    pub fn unbind(&self) {
        self.run(|c| c.unbind());
    }

    // ===== Playback Control =====

    /// Start or resume playback
    pub fn play(&self) -> Result<(), JsValue> {
        self.run(|c| c.play()).map_err(to_js)
    }

    /// Pause playback
    pub fn pause(&self) {
        self.run(|c| c.pause());
    }

    /// Toggle play/pause
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) -> Result<(), JsValue> {
        self.run(|c| c.toggle_play()).map_err(to_js)
    }

    /// Seek to position in seconds
    pub fn seek(&self, position_secs: f64) {
        self.run(|c| c.seek(position_secs));
    }

    /// Skip to next track
    #[wasm_bindgen(js_name = nextTrack)]
    pub fn next_track(&self) -> Result<(), JsValue> {
        self.run(|c| c.next_track()).map_err(to_js)
    }

    /// Restart or go to previous track
    #[wasm_bindgen(js_name = previousTrack)]
    pub fn previous_track(&self) -> Result<(), JsValue> {
        self.run(|c| c.previous_track()).map_err(to_js)
    }

    /// Jump to track at index and play it
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&self, index: usize) -> Result<(), JsValue> {
        self.run(|c| c.select_track(index)).map_err(to_js)
    }

    // ===== Volume Control =====

    /// Set volume (0.0-1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f32) {
        self.run(|c| c.set_volume(volume));
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        self.run(|c| c.toggle_mute());
    }

    /// Set mute flag
    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&self, muted: bool) {
        self.run(|c| c.set_muted(muted));
    }

    // ===== State Queries =====

    /// Current state as a `PlayerSnapshot` object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.controller.borrow().snapshot();
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Playlist table rows
    #[wasm_bindgen(js_name = playlistRows)]
    pub fn playlist_rows(&self) -> JsValue {
        let controller = self.controller.borrow();
        let rows = view::track_rows(controller.playlist(), controller.current_index());
        serde_wasm_bindgen::to_value(&rows).unwrap_or(JsValue::NULL)
    }

    /// Format seconds as `MM:SS`
    #[wasm_bindgen(js_name = formatTime)]
    pub fn format_time(secs: f64) -> String {
        view::format_time(secs)
    }

    // ===== Event Listeners =====

    /// Register (or clear) the event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Option<Function>) {
        self.dispatcher.set_callback(callback);
        self.dispatcher.flush();
    }

    /// Toggle playback with the spacebar while this player is alive
    #[wasm_bindgen(js_name = bindKeyboard)]
    pub fn bind_keyboard(&mut self) -> Result<(), JsValue> {
        let controller = Rc::downgrade(&self.controller);
        let dispatcher = Rc::clone(&self.dispatcher);

        let binding = KeyboardBinding::attach(move |code, key| {
            let Some(controller) = controller.upgrade() else {
                return KeyResponse::Ignored;
            };
            let response = match controller.try_borrow_mut() {
                Ok(mut ctrl) => ctrl.handle_key(code, key),
                Err(_) => return KeyResponse::Ignored,
            };
            dispatcher.flush();
            response
        })?;

        // Replacing drops (and detaches) any earlier binding
        self.keyboard = Some(binding);
        Ok(())
    }

    /// Remove the spacebar binding
    #[wasm_bindgen(js_name = unbindKeyboard)]
    pub fn unbind_keyboard(&mut self) {
        self.keyboard = None;
    }
}

impl WasmRetroPlayer {
    fn with_config(config: ControllerConfig) -> Self {
        let dispatcher = Rc::new(Dispatcher::default());
        let backend = HtmlAudioBackend::new(Rc::clone(&dispatcher));
        let controller = Rc::new(RefCell::new(PlaybackController::new(backend, config)));
        dispatcher.attach(&controller);

        Self {
            controller,
            dispatcher,
            keyboard: None,
        }
    }

    fn run<T>(&self, op: impl FnOnce(&mut PlaybackController<HtmlAudioBackend>) -> T) -> T {
        let output = op(&mut self.controller.borrow_mut());
        self.dispatcher.flush();
        output
    }
}

fn to_js(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
