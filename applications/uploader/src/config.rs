/// Uploader configuration
use crate::error::{Result, UploaderError};
use retro_backend::{BackendConfig, DEFAULT_BUCKET, DEFAULT_TRACKS_TABLE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "retro.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploaderConfig {
    /// Supabase project URL
    #[serde(default)]
    pub backend_url: String,

    /// Public anon key
    #[serde(default)]
    pub backend_anon_key: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default = "default_tracks_table")]
    pub tracks_table: String,

    /// Sign in as this user before touching the catalog
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl UploaderConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `retro.toml` is read when
    /// present. `RETRO_`-prefixed variables override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// [`load`](Self::load) with an injected environment instead of the
    /// process environment
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(UploaderError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (RETRO_BACKEND_URL, RETRO_EMAIL, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("RETRO")
                .prefix_separator("_")
                .source(env),
        );

        let config = settings
            .build()
            .map_err(|e| UploaderError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| UploaderError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(UploaderError::Config(
                "backend URL is required (set RETRO_BACKEND_URL)".to_string(),
            ));
        }
        if self.backend_anon_key.trim().is_empty() {
            return Err(UploaderError::Config(
                "anon key is required (set RETRO_BACKEND_ANON_KEY)".to_string(),
            ));
        }
        if self.bucket.trim().is_empty() || self.tracks_table.trim().is_empty() {
            return Err(UploaderError::Config(
                "bucket and tracks table cannot be empty".to_string(),
            ));
        }
        if self.email.is_some() != self.password.is_some() {
            return Err(UploaderError::Config(
                "email and password must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Credentials, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }

    /// Backend client configuration
    pub fn backend(&self) -> BackendConfig {
        BackendConfig::new(&self.backend_url, &self.backend_anon_key)
            .with_bucket(&self.bucket)
            .with_tracks_table(&self.tracks_table)
    }
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_tracks_table() -> String {
    DEFAULT_TRACKS_TABLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UploaderConfig {
        UploaderConfig {
            backend_url: "https://abc.supabase.co".to_string(),
            backend_anon_key: "anon".to_string(),
            bucket: default_bucket(),
            tracks_table: default_tracks_table(),
            email: None,
            password: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_missing_url_rejected() {
        let config = UploaderConfig {
            backend_url: String::new(),
            ..config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("RETRO_BACKEND_URL"));
    }

    #[test]
    fn test_half_credentials_rejected() {
        let config = UploaderConfig {
            email: Some("a@b.c".to_string()),
            ..config()
        };
        assert!(config.validate().is_err());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_backend_config_carries_bucket() {
        let config = UploaderConfig {
            bucket: "demo-audio".to_string(),
            ..config()
        };
        assert_eq!(config.backend().bucket, "demo-audio");
    }
}
