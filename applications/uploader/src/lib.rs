//! Retro Rhythm uploader
//!
//! Pushes local audio files into the project's storage bucket and tracks
//! table, and lists what is already there.

pub mod commands;
pub mod config;
pub mod error;

pub use config::UploaderConfig;
pub use error::{Result, UploaderError};
