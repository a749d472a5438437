//! WASM bindings for retro-playback
//!
//! Browser implementation of the audio facility on top of `HTMLAudioElement`,
//! plus a JavaScript-facing player wrapping [`PlaybackController`](crate::PlaybackController).

mod backend;
mod keyboard;
mod player;
mod probe;

pub use backend::{Dispatcher, HtmlAudioBackend, HtmlAudioResource};
pub use keyboard::KeyboardBinding;
pub use player::WasmRetroPlayer;
pub use probe::HtmlDurationProbe;

use wasm_bindgen::{JsCast, JsValue};

/// Best-effort text for a thrown JS value
pub(crate) fn describe_js_error(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}
