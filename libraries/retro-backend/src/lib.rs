//! Retro Rhythm Backend Client
//!
//! HTTP client for the Supabase project behind Retro Rhythm.
//!
//! # Features
//!
//! - **Authentication**: Email/password sign-in and sign-up, session restore
//! - **Catalog**: Track listing, lookup, insert and duration updates
//! - **Storage**: Audio uploads and public object URLs
//! - **Upload pipeline**: Local files to stored, catalogued tracks
//!
//! The catalog and storage clients implement `retro_core::TrackCatalog` and
//! `retro_core::AudioStorage`.
//!
//! # Example
//!
//! ```ignore
//! use retro_backend::{BackendConfig, SupabaseClient, UploadPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SupabaseClient::new(BackendConfig::new("https://abc.supabase.co", "anon-key"))?;
//!     client.sign_in("listener@example.com", "hunter22").await?;
//!
//!     let pipeline = UploadPipeline::new(client.storage(), client.catalog());
//!     let track = pipeline.ingest(std::fs::read("Plastic_Love.mp3")?, "Plastic_Love.mp3").await?;
//!     println!("Uploaded {}", track.title);
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod catalog;
mod client;
mod error;
mod pipeline;
mod storage;
mod types;

pub use auth::{AuthClient, MIN_PASSWORD_LEN};
pub use catalog::SupabaseCatalog;
pub use client::SupabaseClient;
pub use error::{BackendError, Result};
pub use pipeline::{mime_type_for_file, title_from_file_name, UploadOutcome, UploadPipeline};
pub use storage::{public_object_url, StorageClient};
pub use types::{
    AuthSessionResponse, AuthUser, BackendConfig, RowId, SignUpResponse, TrackRow,
    UploadProgress, UploadStage, UserMetadata, DEFAULT_BUCKET, DEFAULT_TRACKS_TABLE,
};
