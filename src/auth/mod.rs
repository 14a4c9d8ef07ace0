//! Authentication layer.
//!
//! All credential checking and session issuance is delegated to an external
//! auth provider; this module only defines the seam and carries the opaque
//! token between requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           Session Middleware            │
//! │   (cookie → token → current user)       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           AuthProvider Trait            │
//! │  (sign_in / sign_up / verify / user)    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            HttpAuthProvider             │
//! │       (GoTrue-style REST client)        │
//! └─────────────────────────────────────────┘
//! ```

pub mod cookie;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use cookie::{SessionCookie, SESSION_COOKIE_NAME};
pub use http::HttpAuthProvider;

// =============================================================================
// Types
// =============================================================================

/// A user as reported by the auth provider.
///
/// The display name is attached as metadata at signup time and read back
/// after login for the gallery greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned user identifier
    pub id: String,

    /// Email address the account was registered with
    pub email: String,

    /// Display name from signup metadata, if any
    pub name: Option<String>,
}

impl User {
    /// The name to greet the user with: display name, or email as fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// A logged-in session issued by the auth provider.
///
/// The access token is opaque to this application; it is stored in the
/// session cookie and handed back to the provider on every gated request.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque bearer token for subsequent provider calls
    pub access_token: String,

    /// The user this session belongs to
    pub user: User,
}

// =============================================================================
// AuthProvider Trait
// =============================================================================

/// Seam over the external authentication provider.
///
/// This abstraction lets the HTTP layer run against the real provider in
/// production and a scripted mock in tests.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with email and password, returning a session on success.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError>;

    /// Register a new account with a display name attached as metadata.
    async fn sign_up(&self, email: &str, password: &str, name: &str)
        -> Result<User, ProviderError>;

    /// Verify a signup confirmation one-time-password for an email address.
    async fn verify_otp(&self, email: &str, token: &str) -> Result<(), ProviderError>;

    /// Resolve the user behind an access token, or fail if the session is gone.
    async fn get_user(&self, access_token: &str) -> Result<User, ProviderError>;

    /// Invalidate a session on the provider side.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;
}

// =============================================================================
// Tests
// =============================================================================
