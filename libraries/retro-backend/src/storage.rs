//! Audio object storage.

use crate::client::{authorize, check_status, Connection};
use crate::error::{BackendError, Result};
use crate::types::UploadObjectResponse;
use async_trait::async_trait;
use retro_core::{AudioStorage, RetroError};
use tracing::{debug, info};
use url::Url;

/// Storage client for the configured audio bucket.
#[derive(Debug, Clone)]
pub struct StorageClient {
    conn: Connection,
}

impl StorageClient {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Upload `bytes` as `name` and return the object's path in the bucket.
    ///
    /// Existing objects are never overwritten.
    pub async fn upload(&self, bytes: Vec<u8>, name: &str, content_type: &str) -> Result<String> {
        let name = name.trim_matches('/');
        if name.is_empty() {
            return Err(BackendError::InvalidInput("object name cannot be empty".into()));
        }

        let config = self.conn.snapshot().await;
        let url = object_url(&config.url, &["storage", "v1", "object", &config.bucket], name)?;
        let size = bytes.len();
        debug!(url = %url, size, content_type, "Uploading object");

        let request = self
            .conn
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);

        let response = authorize(request, &config)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        // Storage reports duplicates as 400 with a 409 statusCode in the body
        let status = response.status().as_u16();
        if status == 409 {
            return Err(BackendError::Conflict(name.to_string()));
        }
        let response = match check_status(response).await {
            Err(BackendError::ServerError { message, .. }) if message.contains("\"409\"") => {
                return Err(BackendError::Conflict(name.to_string()));
            }
            other => other?,
        };

        let uploaded: UploadObjectResponse = response.json().await.map_err(|e| {
            BackendError::ParseError(format!("Failed to parse upload response: {}", e))
        })?;

        let path = uploaded
            .key
            .strip_prefix(&format!("{}/", config.bucket))
            .unwrap_or(name)
            .to_string();

        info!(bucket = %config.bucket, path = %path, size, "Audio file uploaded");
        Ok(path)
    }

    /// Public URL of an object in the bucket.
    pub async fn public_url(&self, path: &str) -> Result<String> {
        let config = self.conn.snapshot().await;
        public_object_url(&config.url, &config.bucket, path)
    }
}

#[async_trait]
impl AudioStorage for StorageClient {
    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        name: &str,
        content_type: &str,
    ) -> retro_core::Result<String> {
        self.upload(bytes, name, content_type)
            .await
            .map_err(|e| match e {
                BackendError::ServerError { .. }
                | BackendError::Conflict(_)
                | BackendError::ParseError(_) => RetroError::storage(e.to_string()),
                other => other.into(),
            })
    }
}

/// `<base>/storage/v1/object/public/<bucket>/<path>`
///
/// Path segments are percent-encoded; empty segments (`a//b`) are dropped.
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> Result<String> {
    object_url(
        base_url,
        &["storage", "v1", "object", "public", bucket],
        path,
    )
    .map(String::from)
}

fn object_url(base_url: &str, prefix: &[&str], path: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| BackendError::InvalidUrl(format!("{} cannot be a base", base_url)))?
        .pop_if_empty()
        .extend(prefix)
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}
