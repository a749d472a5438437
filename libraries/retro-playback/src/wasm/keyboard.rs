//! Document-level keyboard shortcut binding

use crate::KeyResponse;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, KeyboardEvent};

/// `keydown` listener on the document, removed when dropped
pub struct KeyboardBinding {
    document: Document,
    listener: Closure<dyn FnMut(KeyboardEvent)>,
}

impl KeyboardBinding {
    /// Attach `on_key(code, key)`; handled keys get `preventDefault()`
    pub fn attach<F>(mut on_key: F) -> Result<Self, JsValue>
    where
        F: FnMut(&str, &str) -> KeyResponse + 'static,
    {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if on_key(&event.code(), &event.key()).prevents_default() {
                event.prevent_default();
            }
        });
        document.add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())?;

        Ok(Self { document, listener })
    }
}

impl Drop for KeyboardBinding {
    fn drop(&mut self) {
        self.document
            .remove_event_listener_with_callback("keydown", self.listener.as_ref().unchecked_ref())
            .ok();
    }
}
