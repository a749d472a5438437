//! Main Supabase client.

use crate::auth::AuthClient;
use crate::catalog::SupabaseCatalog;
use crate::error::{BackendError, Result};
use crate::storage::StorageClient;
use crate::types::{AuthSessionResponse, BackendConfig, SignUpResponse};
use reqwest::{Client, RequestBuilder, Response};
use retro_core::{AuthSession, SessionUser};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Client for a Retro Rhythm Supabase project.
///
/// Handles the auth session and hands out the catalog and storage clients.
/// Those share this client's configuration, so signing in or out affects
/// every request they make afterwards.
///
/// # Example
///
/// ```ignore
/// use retro_backend::{BackendConfig, SupabaseClient};
/// use retro_core::TrackCatalog;
///
/// let client = SupabaseClient::new(BackendConfig::new("https://abc.supabase.co", "anon-key"))?;
/// client.sign_in("listener@example.com", "hunter22").await?;
///
/// let tracks = client.catalog().list_tracks().await?;
/// println!("Found {} tracks", tracks.len());
/// ```
#[derive(Debug)]
pub struct SupabaseClient {
    conn: Connection,
}

impl SupabaseClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BackendConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(BackendError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BackendError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| BackendError::InvalidUrl(e.to_string()))?;

        if config.anon_key.trim().is_empty() {
            return Err(BackendError::InvalidInput("anon key cannot be empty".into()));
        }

        let normalized_config = BackendConfig { url, ..config };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("RetroRhythm/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BackendError::Request)?;

        Ok(Self {
            conn: Connection {
                http,
                config: Arc::new(RwLock::new(normalized_config)),
            },
        })
    }

    /// Get the project URL.
    pub async fn url(&self) -> String {
        self.conn.config.read().await.url.clone()
    }

    /// Check if the client holds a user access token.
    pub async fn is_authenticated(&self) -> bool {
        self.conn.config.read().await.access_token.is_some()
    }

    /// Set the access token directly (e.g., from a stored session).
    pub async fn set_access_token(&self, access_token: Option<String>) {
        self.conn.config.write().await.access_token = access_token;
    }

    /// Get the current access token.
    pub async fn access_token(&self) -> Option<String> {
        self.conn.config.read().await.access_token.clone()
    }

    // ===== Authentication =====

    /// Sign in with email and password.
    ///
    /// On success, the access token is stored for subsequent requests.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSessionResponse> {
        let config = self.conn.snapshot().await;
        let auth = AuthClient::new(&self.conn.http, &config.url, &config.anon_key);
        let session = auth.sign_in(email, password).await?;

        self.set_access_token(Some(session.access_token.clone())).await;
        Ok(session)
    }

    /// Create an account.
    ///
    /// When the project signs new users in immediately, the returned token is
    /// stored like a sign-in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpResponse> {
        let config = self.conn.snapshot().await;
        let auth = AuthClient::new(&self.conn.http, &config.url, &config.anon_key);
        let response = auth.sign_up(email, password, username).await?;

        if let Some(token) = response.access_token() {
            self.set_access_token(Some(token.to_string())).await;
        }
        Ok(response)
    }

    /// Sign out and forget the access token.
    ///
    /// The local token is cleared even if the backend call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let config = self.conn.snapshot().await;
        let Some(token) = config.access_token.as_deref() else {
            return Ok(());
        };

        let auth = AuthClient::new(&self.conn.http, &config.url, &config.anon_key);
        let result = auth.sign_out(token).await;

        self.set_access_token(None).await;
        info!("Signed out");
        result
    }

    /// The signed-in user, `None` without a valid session.
    pub async fn current_user(&self) -> Result<Option<SessionUser>> {
        let config = self.conn.snapshot().await;
        let Some(token) = config.access_token.as_deref() else {
            return Ok(None);
        };

        let auth = AuthClient::new(&self.conn.http, &config.url, &config.anon_key);
        match auth.get_user(token).await {
            Ok(user) => Ok(Some(user.into())),
            Err(BackendError::AuthRequired) => {
                debug!("Stored access token rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the stored session into a settled [`AuthSession`].
    ///
    /// Backend failures settle as signed out.
    pub async fn restore_session(&self) -> AuthSession {
        let mut session = AuthSession::restoring();
        let user = match self.current_user().await {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "Could not restore session");
                None
            }
        };
        session.finish_loading(user);
        session
    }

    // ===== Sub-clients =====

    /// Track catalog backed by the tracks table.
    pub fn catalog(&self) -> SupabaseCatalog {
        SupabaseCatalog::new(self.conn.clone())
    }

    /// Audio storage backed by the configured bucket.
    pub fn storage(&self) -> StorageClient {
        StorageClient::new(self.conn.clone())
    }
}

/// HTTP client plus the shared, mutable configuration
#[derive(Debug, Clone)]
pub(crate) struct Connection {
    pub(crate) http: Client,
    config: Arc<RwLock<BackendConfig>>,
}

impl Connection {
    /// Copy of the current configuration
    pub(crate) async fn snapshot(&self) -> BackendConfig {
        self.config.read().await.clone()
    }
}

/// Add `apikey` and bearer headers; the anon key stands in for a user token.
pub(crate) fn authorize(builder: RequestBuilder, config: &BackendConfig) -> RequestBuilder {
    let bearer = config.access_token.as_deref().unwrap_or(&config.anon_key);
    builder.header("apikey", &config.anon_key).bearer_auth(bearer)
}

/// Map error statuses shared by the REST and storage endpoints.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status.as_u16() == 401 || status.as_u16() == 403 {
        Err(BackendError::AuthRequired)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(BackendError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        let client = |url: &str| SupabaseClient::new(BackendConfig::new(url, "anon"));

        assert!(client("https://abc.supabase.co").is_ok());
        assert!(client("http://localhost:54321").is_ok());

        assert!(client("").is_err());
        assert!(client("abc.supabase.co").is_err());
        assert!(client("ftp://abc.supabase.co").is_err());
    }

    #[test]
    fn test_anon_key_required() {
        let result = SupabaseClient::new(BackendConfig::new("https://abc.supabase.co", "  "));
        assert!(matches!(result, Err(BackendError::InvalidInput(_))));
    }

    #[test]
    fn test_url_normalization() {
        let client =
            SupabaseClient::new(BackendConfig::new("https://abc.supabase.co/", "anon")).unwrap();

        let url = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(client.url());
        assert_eq!(url, "https://abc.supabase.co");
    }
}
