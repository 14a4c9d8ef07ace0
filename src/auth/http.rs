//! HTTP client for a GoTrue-style auth provider REST API.
//!
//! Endpoints used:
//!
//! - `POST {base}/token?grant_type=password` - password sign-in
//! - `POST {base}/signup` - account registration with name metadata
//! - `POST {base}/verify` - signup OTP confirmation
//! - `GET  {base}/user` - resolve the user behind a bearer token
//! - `POST {base}/logout` - invalidate a session
//!
//! Every request carries the project API key in an `apikey` header. The
//! provider's error message is preserved verbatim in [`ProviderError`] so
//! the signup and confirmation screens can surface it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use crate::error::ProviderError;

use super::{AuthProvider, Session, User};

/// Request timeout for all provider calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Wire Types
// =============================================================================

/// User shape on the provider wire: metadata carries the display name.
#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: WireUserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct WireUserMetadata {
    #[serde(default)]
    name: Option<String>,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        User {
            id: wire.id,
            email: wire.email,
            name: wire.user_metadata.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: WireUser,
}

/// Error body the provider returns; field names vary across endpoints.
#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(alias = "msg", alias = "error_description", alias = "message")]
    error: Option<String>,
}

// =============================================================================
// HttpAuthProvider
// =============================================================================

/// Auth provider client over HTTP.
#[derive(Clone)]
pub struct HttpAuthProvider {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAuthProvider {
    /// Create a client for the provider at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the provider REST API, without trailing slash
    /// * `api_key` - Project API key sent as the `apikey` header, if required
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("reqwest client with static configuration");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Get the provider base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key),
            None => request,
        }
    }

    /// Turn a non-success response into a `ProviderError`, keeping the
    /// provider's message when one is present.
    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<WireError>(&body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("Provider returned status {}", status)
                } else {
                    body
                }
            });

        ProviderError::Provider { status, message }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError> {
        let response = self
            .apply_key(self.http.post(self.endpoint("/token?grant_type=password")))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        // Wrong credentials come back as 400/401/422 depending on provider
        // version; all of them mean the same thing to the login screen.
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            return Err(ProviderError::InvalidCredentials);
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(Session {
            access_token: token.access_token,
            user: token.user.into(),
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, ProviderError> {
        let response = self
            .apply_key(self.http.post(self.endpoint("/signup")))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let user: WireUser = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(user.into())
    }

    async fn verify_otp(&self, email: &str, token: &str) -> Result<(), ProviderError> {
        let response = self
            .apply_key(self.http.post(self.endpoint("/verify")))
            .json(&serde_json::json!({
                "type": "signup",
                "email": email,
                "token": token,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<User, ProviderError> {
        let response = self
            .apply_key(self.http.get(self.endpoint("/user")))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::NoSession);
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let user: WireUser = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(user.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let response = self
            .apply_key(self.http.post(self.endpoint("/logout")))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
