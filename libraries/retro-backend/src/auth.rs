//! Authentication methods for the Supabase auth service.

use crate::error::{BackendError, Result};
use crate::types::{
    AuthErrorBody, AuthSessionResponse, AuthUser, SignInRequest, SignUpRequest, SignUpResponse,
    UserMetadata,
};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication client for `/auth/v1`.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    anon_key: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, anon_key: &'a str) -> Self {
        Self {
            http,
            base_url,
            anon_key,
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSessionResponse> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(BackendError::InvalidInput("Password is required".into()));
        }

        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        debug!(url = %url, email = %email, "Attempting sign-in");

        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .header("apikey", self.anon_key)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let session: AuthSessionResponse = response.json().await.map_err(|e| {
                BackendError::ParseError(format!("Failed to parse session: {}", e))
            })?;

            info!(user_id = %session.user.id, "Sign-in successful");
            Ok(session)
        } else if status.as_u16() == 400 || status.as_u16() == 401 {
            let message = rejection_message(response, "Invalid login credentials").await;
            warn!(status = %status, error = %message, "Sign-in rejected");
            Err(BackendError::AuthFailed(message))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(BackendError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    /// Create an account with a username.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<SignUpResponse> {
        let email = validate_email(email)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(BackendError::InvalidInput("Username is required".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BackendError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let url = format!("{}/auth/v1/signup", self.base_url);
        debug!(url = %url, email = %email, username = %username, "Attempting sign-up");

        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            data: UserMetadata {
                username: Some(username.to_string()),
            },
        };

        let response = self
            .http
            .post(&url)
            .header("apikey", self.anon_key)
            .json(&request)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let created: SignUpResponse = response.json().await.map_err(|e| {
                BackendError::ParseError(format!("Failed to parse sign-up response: {}", e))
            })?;

            info!(
                user_id = %created.user().id,
                confirmed = created.access_token().is_some(),
                "Sign-up successful"
            );
            Ok(created)
        } else if status.as_u16() == 400 || status.as_u16() == 422 {
            let message = rejection_message(response, "Sign-up rejected").await;
            warn!(status = %status, error = %message, "Sign-up rejected");
            Err(BackendError::AuthFailed(message))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(BackendError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    /// Revoke the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        debug!(url = %url, "Signing out");

        let response = self
            .http
            .post(&url)
            .header("apikey", self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let status = response.status();

        // An already expired session is as good as signed out
        if status.is_success() || status.as_u16() == 401 {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(BackendError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    /// Get the user behind `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let url = format!("{}/auth/v1/user", self.base_url);
        debug!(url = %url, "Getting current user");

        let response = self
            .http
            .get(&url)
            .header("apikey", self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| BackendError::ParseError(format!("Failed to parse user: {}", e)))
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
}

fn validate_email(email: &str) -> Result<&str> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(BackendError::InvalidInput(format!(
            "Invalid email address: {:?}",
            email
        ))),
    }
}

async fn rejection_message(response: Response, fallback: &str) -> String {
    response
        .json::<AuthErrorBody>()
        .await
        .ok()
        .and_then(|body| body.msg)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert_eq!(validate_email("  a@b.c ").unwrap(), "a@b.c");
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@b.c").is_err());
        assert!(validate_email("a@").is_err());
    }

    #[tokio::test]
    async fn sign_up_validates_before_sending() {
        let http = Client::new();
        // Port 9 is never contacted: validation fails first
        let auth = AuthClient::new(&http, "http://127.0.0.1:9", "anon");

        let err = auth.sign_up("a@b.c", "secret1", "   ").await.unwrap_err();
        assert!(err.to_string().contains("Username is required"));

        let err = auth.sign_up("a@b.c", "12345", "anri").await.unwrap_err();
        assert!(err.to_string().contains("at least 6"));
    }
}
