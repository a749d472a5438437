//! Retro Rhythm Core
//!
//! Platform-agnostic core types, traits, and error handling for Retro Rhythm.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `Playlist`
//! - **Collaborator Traits**: `TrackCatalog`, `AudioStorage`
//! - **Session Gating**: `AuthSession`, `Route`, `guard`
//! - **Error Handling**: Unified `RetroError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use retro_core::types::{Playlist, Track, TrackId};
//!
//! let track = Track::new(
//!     TrackId::new("1"),
//!     "Plastic Love",
//!     "Mariya Takeuchi",
//!     "https://example.com/plastic-love.mp3",
//! );
//!
//! let playlist = Playlist::new(vec![track]);
//! assert_eq!(playlist.len(), 1);
//! assert!(!playlist.get(0).unwrap().has_known_duration());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod session;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RetroError};
pub use session::{guard, AccessPolicy, AuthSession, GuardDecision, Route, SessionUser};
pub use traits::{AudioStorage, TrackCatalog};
pub use types::{Playlist, Track, TrackId};
