//! Types for Supabase requests and responses.

use chrono::{DateTime, Utc};
use retro_core::{SessionUser, TrackId};
use serde::{Deserialize, Serialize};

/// Default storage bucket for audio files
pub const DEFAULT_BUCKET: &str = "audio-files";

/// Default table holding track rows
pub const DEFAULT_TRACKS_TABLE: &str = "tracks";

/// Configuration for connecting to a Supabase project.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project URL (e.g., "https://abc.supabase.co")
    pub url: String,
    /// Public anon key, sent as `apikey` on every request
    pub anon_key: String,
    /// Storage bucket for audio files
    pub bucket: String,
    /// Table holding track rows
    pub tracks_table: String,
    /// User access token (if signed in)
    pub access_token: Option<String>,
}

impl BackendConfig {
    /// Create a config with default bucket and table.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
            tracks_table: DEFAULT_TRACKS_TABLE.to_string(),
            access_token: None,
        }
    }

    /// Use a different storage bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Use a different tracks table.
    #[must_use]
    pub fn with_tracks_table(mut self, table: impl Into<String>) -> Self {
        self.tracks_table = table.into();
        self
    }

    /// Start with an existing access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for password sign-in.
#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Request body for sign-up.
#[derive(Debug, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub data: UserMetadata,
}

/// Profile data stored alongside the auth user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// User record returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl From<AuthUser> for SessionUser {
    fn from(user: AuthUser) -> Self {
        SessionUser {
            id: user.id,
            email: user.email,
            username: user.user_metadata.username,
        }
    }
}

/// Response from a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSessionResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token validity in seconds
    #[serde(default)]
    pub expires_in: u64,
    pub user: AuthUser,
}

/// Response from sign-up.
///
/// With e-mail confirmation enabled the backend returns the bare user and no
/// session; otherwise it signs the user in directly.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(AuthSessionResponse),
    PendingConfirmation(AuthUser),
}

impl SignUpResponse {
    /// The created user
    pub fn user(&self) -> &AuthUser {
        match self {
            Self::Session(session) => &session.user,
            Self::PendingConfirmation(user) => user,
        }
    }

    /// Access token, if the user was signed in immediately
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Session(session) => Some(&session.access_token),
            Self::PendingConfirmation(_) => None,
        }
    }
}

/// Error body returned by the auth endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthErrorBody {
    #[serde(default, alias = "error_description", alias = "message")]
    pub msg: Option<String>,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Row id: integer or uuid depending on the table definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl From<RowId> for TrackId {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Int(n) => TrackId::from(n),
            RowId::Text(s) => TrackId::new(s),
        }
    }
}

/// A row of the tracks table.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRow {
    pub id: RowId,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    pub file_path: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert body for a freshly uploaded file.
#[derive(Debug, Serialize)]
pub struct NewTrackRow<'a> {
    pub title: &'a str,
    pub file_path: &'a str,
    pub duration: f64,
}

/// Patch body for a probed duration.
#[derive(Debug, Serialize)]
pub struct DurationPatch {
    pub duration: f64,
}

// =============================================================================
// Storage Types
// =============================================================================

/// Response from an object upload.
#[derive(Debug, Deserialize)]
pub struct UploadObjectResponse {
    /// `<bucket>/<name>`
    #[serde(rename = "Key")]
    pub key: String,
}

/// Stage of one file in an upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStage {
    Uploading,
    Done,
    Failed,
}

/// Progress information during a batch upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub file_index: usize,
    pub total_files: usize,
    pub current_file: String,
    pub stage: UploadStage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_ids_accept_numbers_and_strings() {
        let row: TrackRow = serde_json::from_str(
            r#"{"id": 12, "title": "Skyfall", "file_path": "Skyfall.opus"}"#,
        )
        .unwrap();
        assert_eq!(TrackId::from(row.id), TrackId::new("12"));
        assert!(row.artist.is_none());

        let row: TrackRow = serde_json::from_str(
            r#"{"id": "5f1c", "title": "x", "file_path": "x.mp3", "created_at": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(row.id, RowId::Text("5f1c".to_string()));
        assert!(row.created_at.is_some());
    }

    #[test]
    fn sign_up_without_session_is_pending() {
        let json = r#"{"id": "u1", "email": "a@b.c", "user_metadata": {"username": "anri"}}"#;
        let response: SignUpResponse = serde_json::from_str(json).unwrap();
        assert!(response.access_token().is_none());
        assert_eq!(response.user().user_metadata.username.as_deref(), Some("anri"));
    }

    #[test]
    fn auth_user_becomes_session_user() {
        let user = AuthUser {
            id: "u1".to_string(),
            email: Some("a@b.c".to_string()),
            user_metadata: UserMetadata {
                username: Some("anri".to_string()),
            },
        };
        let session_user = SessionUser::from(user);
        assert_eq!(session_user.username.as_deref(), Some("anri"));
    }
}
