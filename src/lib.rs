//! # Photo Share
//!
//! A small photo-sharing web app backed by an external auth provider and
//! S3-compatible object storage.
//!
//! The server renders every screen itself: login, signup, email
//! confirmation, and a session-gated gallery where photos can be uploaded
//! from disk, captured from the camera, and deleted. Account state lives
//! entirely in the auth provider; photo bytes live entirely in the bucket.
//!
//! ## Features
//!
//! - **Delegated auth**: Password login, signup with email confirmation,
//!   and session checks against a REST auth provider
//! - **Signed session cookie**: The provider's access token travels in an
//!   HMAC-SHA256 signed, HttpOnly cookie
//! - **Session gate**: Gallery routes verify the session with the provider
//!   on every request
//! - **Camera capture**: In-browser capture posts a PNG data URL that the
//!   server decodes and stores like any upload
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`auth`] - Auth provider trait, HTTP client, and session cookie
//! - [`storage`] - Photo store trait and S3 implementation
//! - [`photo`] - Storage key derivation and data URL decoding
//! - [`server`] - Axum-based HTTP server, pages, and session gate
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use photo_share::auth::HttpAuthProvider;
//! use photo_share::server::{create_router, RouterConfig};
//! use photo_share::storage::{create_s3_client, S3PhotoStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = Arc::new(HttpAuthProvider::new(
//!         "https://auth.example.com/auth/v1",
//!         None,
//!     ));
//!
//!     let s3_client = create_s3_client(None, "us-east-1").await;
//!     let store = Arc::new(S3PhotoStore::new(
//!         s3_client,
//!         "photos".to_string(),
//!         "us-east-1".to_string(),
//!         None,
//!     ));
//!
//!     let config = RouterConfig::new("0123456789abcdef0123456789abcdef");
//!     let router = create_router(provider, store, config);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod photo;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use auth::{
    AuthProvider, HttpAuthProvider, Session, SessionCookie, User, SESSION_COOKIE_NAME,
};
pub use config::Config;
pub use error::{CookieError, DataUrlError, ProviderError, StorageError};
pub use photo::{decode_image_data_url, extension_for_mime, photo_key, unix_millis, DecodedImage};
pub use server::{create_router, session_middleware, AppState, RouterConfig, SessionGate};
pub use storage::{
    content_type_for, create_s3_client, PhotoStore, S3PhotoStore, StoredObject,
    PLACEHOLDER_SENTINEL,
};
