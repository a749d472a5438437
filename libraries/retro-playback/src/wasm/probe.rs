//! Duration probe using a transient audio element

use super::describe_js_error;
use crate::{DurationProbe, PlaybackError, Result};
use async_trait::async_trait;
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Loads only metadata, reads `duration`, then drops the element
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlDurationProbe;

#[async_trait(?Send)]
impl DurationProbe for HtmlDurationProbe {
    async fn probe_duration(&self, locator: &str) -> Result<f64> {
        let element = HtmlAudioElement::new_with_src(locator)
            .map_err(|e| PlaybackError::ResourceLoad(describe_js_error(&e)))?;
        element.set_preload("metadata");

        let mut executor = |resolve: Function, reject: Function| {
            let target = element.clone();
            let on_loaded = Closure::once_into_js(move || {
                resolve
                    .call1(&JsValue::NULL, &JsValue::from_f64(target.duration()))
                    .ok();
            });
            let on_error = Closure::once_into_js(move || {
                reject
                    .call1(&JsValue::NULL, &JsValue::from_str("failed to load audio metadata"))
                    .ok();
            });
            element.set_onloadedmetadata(Some(on_loaded.unchecked_ref()));
            element.set_onerror(Some(on_error.unchecked_ref()));
        };
        let loaded = JsFuture::from(Promise::new(&mut executor)).await;

        element.set_onloadedmetadata(None);
        element.set_onerror(None);
        // Dropping `src` alone keeps the fetch alive until load() resets it
        element.remove_attribute("src").ok();
        element.load();

        let value = loaded.map_err(|e| PlaybackError::ResourceLoad(describe_js_error(&e)))?;
        value
            .as_f64()
            .ok_or_else(|| PlaybackError::ResourceLoad("duration is not a number".to_string()))
    }
}
