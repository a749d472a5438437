//! Domain types for Retro Rhythm

mod ids;
mod playlist;
mod track;

pub use ids::TrackId;
pub use playlist::Playlist;
pub use track::Track;
