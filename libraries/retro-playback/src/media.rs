//! Audio facility abstraction
//!
//! The controller never touches a platform audio API. A backend hands out one
//! resource per binding, and the platform feeds the resource's callbacks back
//! as [`MediaEvent`]s tagged with the binding that produced them.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Identifies one acquisition of an audio resource
///
/// Every bind gets a fresh id, so callbacks still in flight for a released
/// resource can be told apart from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingId(u64);

impl BindingId {
    /// Create a binding id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why the host refused a play request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayRejection {
    /// Autoplay policy: no user gesture yet
    PolicyDenied,

    /// Superseded by a pause or a source change
    Aborted,

    /// Anything else (unsupported source, decode failure)
    Other(String),
}

impl PlayRejection {
    /// Classify a rejection by its DOMException name
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "NotAllowedError" => PlayRejection::PolicyDenied,
            "AbortError" => PlayRejection::Aborted,
            other => PlayRejection::Other(other.to_string()),
        }
    }
}

/// Callback from the audio facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Metadata loaded; duration is now trustworthy
    MetadataLoaded {
        /// Resource duration in seconds
        duration_secs: f64,
    },

    /// Enough data buffered to start rendering
    CanPlay,

    /// A play request succeeded
    PlayStarted,

    /// A play request was refused
    PlayRejected {
        /// Classified reason
        reason: PlayRejection,
    },

    /// Playback position advanced
    TimeUpdate {
        /// Current position in seconds
        position_secs: f64,
    },

    /// Natural end of the resource
    Ended,

    /// Network or format failure
    LoadFailed {
        /// Host-provided description
        message: String,
    },
}

/// One playable audio resource
///
/// Commands are fire-and-forget; outcomes come back as [`MediaEvent`]s.
pub trait AudioResource {
    /// Ask the host to start rendering
    fn request_play(&mut self);

    /// Stop rendering, keep position
    fn pause(&mut self);

    /// Jump to a position in seconds
    fn seek(&mut self, position_secs: f64);

    /// Apply the audible volume (0.0-1.0)
    fn set_volume(&mut self, volume: f32);

    /// Stop playback and detach every listener
    ///
    /// Called exactly once, by [`ResourceGuard`]'s `Drop`.
    fn release(&mut self);
}

/// Factory for audio resources
pub trait AudioBackend {
    /// Resource type handed out by this backend
    type Resource: AudioResource;

    /// Start loading `locator` under `binding`
    ///
    /// # Errors
    /// Returns [`PlaybackError::ResourceLoad`](crate::PlaybackError::ResourceLoad)
    /// if the host cannot create a resource for the locator.
    fn acquire(&mut self, binding: BindingId, locator: &str) -> Result<Self::Resource>;
}

/// Owns a resource for the lifetime of one binding
///
/// Dropping the guard releases the resource, whichever path the controller
/// leaves the binding by.
#[derive(Debug)]
pub struct ResourceGuard<R: AudioResource> {
    binding: BindingId,
    resource: R,
}

impl<R: AudioResource> ResourceGuard<R> {
    /// Take ownership of `resource`
    pub fn new(binding: BindingId, resource: R) -> Self {
        Self { binding, resource }
    }

    /// Binding this resource was acquired for
    pub fn binding(&self) -> BindingId {
        self.binding
    }
}

impl<R: AudioResource> Deref for ResourceGuard<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.resource
    }
}

impl<R: AudioResource> DerefMut for ResourceGuard<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

impl<R: AudioResource> Drop for ResourceGuard<R> {
    fn drop(&mut self) {
        tracing::debug!(binding = %self.binding, "Releasing audio resource");
        self.resource.release();
    }
}
