//! `HTMLAudioElement` audio backend

use super::describe_js_error;
use crate::{
    AudioBackend, AudioResource, BindingId, MediaEvent, PlayRejection, PlaybackController,
    PlaybackError, PlayerEvent, Result,
};
use js_sys::Function;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{DomException, Event, HtmlAudioElement};

/// Controller driven by the browser backend
pub type SharedController = Rc<RefCell<PlaybackController<HtmlAudioBackend>>>;

/// Routes element callbacks into the controller and controller events to JS
///
/// A callback may fire while an operation still holds the controller (a
/// synchronous `play()` failure). It then waits in the backlog until that
/// operation flushes.
#[derive(Default)]
pub struct Dispatcher {
    controller: RefCell<Weak<RefCell<PlaybackController<HtmlAudioBackend>>>>,
    backlog: RefCell<VecDeque<(BindingId, MediaEvent)>>,
    on_event: RefCell<Option<Function>>,
}

impl Dispatcher {
    /// Point the dispatcher at its controller
    pub fn attach(&self, controller: &SharedController) {
        *self.controller.borrow_mut() = Rc::downgrade(controller);
    }

    /// Set (or clear) the JS event callback
    pub fn set_callback(&self, callback: Option<Function>) {
        *self.on_event.borrow_mut() = callback;
    }

    /// Queue a facility callback and try to deliver it
    pub fn dispatch(&self, binding: BindingId, event: MediaEvent) {
        self.backlog.borrow_mut().push_back((binding, event));
        self.flush();
    }

    /// Deliver queued callbacks, then forward controller events to JS
    pub fn flush(&self) {
        let Some(controller) = self.controller.borrow().upgrade() else {
            self.backlog.borrow_mut().clear();
            return;
        };

        let events = {
            let Ok(mut ctrl) = controller.try_borrow_mut() else {
                return;
            };
            loop {
                let next = self.backlog.borrow_mut().pop_front();
                let Some((binding, event)) = next else {
                    break;
                };
                ctrl.handle_media_event(binding, event);
            }
            ctrl.drain_events()
        };

        self.forward(&events);
    }

    fn forward(&self, events: &[PlayerEvent]) {
        let Some(callback) = self.on_event.borrow().clone() else {
            return;
        };

        for event in events {
            match serde_wasm_bindgen::to_value(event) {
                Ok(value) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                        warn!(error = %describe_js_error(&e), "Player event callback threw");
                    }
                }
                Err(e) => warn!(error = %e, "Failed to serialize player event"),
            }
        }
    }
}

/// Audio backend creating one `HTMLAudioElement` per binding
pub struct HtmlAudioBackend {
    dispatcher: Rc<Dispatcher>,
}

impl HtmlAudioBackend {
    /// Create a backend reporting through `dispatcher`
    pub fn new(dispatcher: Rc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl AudioBackend for HtmlAudioBackend {
    type Resource = HtmlAudioResource;

    fn acquire(&mut self, binding: BindingId, locator: &str) -> Result<HtmlAudioResource> {
        let element = HtmlAudioElement::new_with_src(locator)
            .map_err(|e| PlaybackError::ResourceLoad(describe_js_error(&e)))?;
        element.set_preload("auto");

        let mut resource = HtmlAudioResource {
            binding,
            element,
            listeners: Vec::new(),
            dispatcher: Rc::clone(&self.dispatcher),
        };
        if let Err(e) = resource.attach_listeners() {
            resource.release();
            return Err(e);
        }

        debug!(%binding, locator, "Created audio element");
        Ok(resource)
    }
}

type ElementListener = Closure<dyn FnMut(Event)>;

/// One `HTMLAudioElement` and the listeners attached to it
pub struct HtmlAudioResource {
    binding: BindingId,
    element: HtmlAudioElement,
    listeners: Vec<(&'static str, ElementListener)>,
    dispatcher: Rc<Dispatcher>,
}

impl HtmlAudioResource {
    fn attach_listeners(&mut self) -> Result<()> {
        self.listen("loadedmetadata", |el| MediaEvent::MetadataLoaded {
            duration_secs: el.duration(),
        })?;
        self.listen("canplay", |_| MediaEvent::CanPlay)?;
        self.listen("timeupdate", |el| MediaEvent::TimeUpdate {
            position_secs: el.current_time(),
        })?;
        self.listen("ended", |_| MediaEvent::Ended)?;
        self.listen("error", |el| MediaEvent::LoadFailed {
            message: media_error_message(el),
        })
    }

    fn listen(
        &mut self,
        name: &'static str,
        to_event: fn(&HtmlAudioElement) -> MediaEvent,
    ) -> Result<()> {
        let element = self.element.clone();
        let dispatcher = Rc::clone(&self.dispatcher);
        let binding = self.binding;

        let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            dispatcher.dispatch(binding, to_event(&element));
        });
        self.element
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            .map_err(|e| PlaybackError::ResourceLoad(describe_js_error(&e)))?;
        self.listeners.push((name, listener));
        Ok(())
    }
}

impl AudioResource for HtmlAudioResource {
    fn request_play(&mut self) {
        let binding = self.binding;
        let dispatcher = Rc::clone(&self.dispatcher);

        match self.element.play() {
            Ok(promise) => spawn_local(async move {
                let event = match JsFuture::from(promise).await {
                    Ok(_) => MediaEvent::PlayStarted,
                    Err(err) => MediaEvent::PlayRejected {
                        reason: classify_rejection(&err),
                    },
                };
                dispatcher.dispatch(binding, event);
            }),
            Err(err) => dispatcher.dispatch(
                binding,
                MediaEvent::PlayRejected {
                    reason: classify_rejection(&err),
                },
            ),
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            debug!(error = %describe_js_error(&e), "pause() failed");
        }
    }

    fn seek(&mut self, position_secs: f64) {
        self.element.set_current_time(position_secs);
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume));
    }

    fn release(&mut self) {
        self.pause();
        for (name, listener) in self.listeners.drain(..) {
            self.element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                .ok();
        }

        // Dropping the source stops any in-flight fetch
        self.element.remove_attribute("src").ok();
        self.element.load();
    }
}

fn classify_rejection(error: &JsValue) -> PlayRejection {
    match error.dyn_ref::<DomException>() {
        Some(exception) => PlayRejection::from_dom_name(&exception.name()),
        None => PlayRejection::Other(describe_js_error(error)),
    }
}

fn media_error_message(element: &HtmlAudioElement) -> String {
    match element.error() {
        Some(error) => {
            let message = error.message();
            if message.is_empty() {
                format!("media error code {}", error.code())
            } else {
                message
            }
        }
        None => "unknown media error".to_string(),
    }
}
