//! Router configuration for the photo share server.
//!
//! This module defines the HTTP routes and applies middleware for the
//! session gate and CORS.
//!
//! # Route Structure
//!
//! ```text
//! /                          - Redirect to /photos (public)
//! /health                    - Health check (public)
//! /login                     - Login page and submission (public)
//! /signup                    - Signup page and submission (public)
//! /auth/confirm              - Email confirmation link (public)
//! /photos                    - Gallery (gated)
//! /photos/upload             - Multipart upload (gated)
//! /photos/capture            - Camera capture (gated)
//! /photos/{key}/delete       - Delete a photo (gated)
//! /logout                    - Sign out (gated)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use photo_share::server::routes::{create_router, RouterConfig};
//!
//! let config = RouterConfig::new("my-cookie-secret")
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(provider, store, config);
//!
//! // Run the server
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    capture_handler, confirm_handler, delete_handler, gallery_handler, health_handler,
    index_handler, login_page_handler, login_submit_handler, logout_handler, signup_page_handler,
    signup_submit_handler, upload_handler, AppState,
};
use super::session::{session_middleware, SessionGate};
use crate::auth::{AuthProvider, SessionCookie};
use crate::storage::PhotoStore;

/// Largest accepted upload body. Phone camera photos sit well under this.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret key for session cookie signing
    pub cookie_secret: String,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given cookie secret.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Tracing is enabled
    pub fn new(cookie_secret: impl Into<String>) -> Self {
        Self {
            cookie_secret: cookie_secret.into(),
            cors_origins: None, // Allow any origin by default
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (health check, auth screens)
/// - Gated routes (gallery, upload, delete, logout)
/// - CORS configuration
/// - Request tracing (optional)
///
/// # Arguments
///
/// * `provider` - The auth provider client
/// * `store` - The photo store
/// * `config` - Router configuration
///
/// # Returns
///
/// A configured Axum router ready to be served.
pub fn create_router<A, S>(provider: Arc<A>, store: Arc<S>, config: RouterConfig) -> Router
where
    A: AuthProvider + 'static,
    S: PhotoStore + 'static,
{
    let cookies = SessionCookie::new(&config.cookie_secret);

    // Create application state and the session gate over the same provider
    let app_state = AppState::new(Arc::clone(&provider), store, cookies.clone());
    let gate = SessionGate::new(provider, cookies);

    // Build CORS layer
    let cors = build_cors_layer(&config);

    // Gallery routes behind the session gate. The middleware is applied to
    // the nested router AFTER nesting so it sees the full /photos/... path.
    let photo_routes = Router::new()
        .route("/", get(gallery_handler::<A, S>))
        .route(
            "/upload",
            post(upload_handler::<A, S>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Data URLs inflate the capture bytes by ~33%, so the capture route
        // needs the same raised body limit as the upload route.
        .route(
            "/capture",
            post(capture_handler::<A, S>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/{key}/delete", post(delete_handler::<A, S>))
        .with_state(app_state.clone());

    let logout_routes = Router::new()
        .route("/", post(logout_handler::<A, S>))
        .with_state(app_state.clone());

    let gated_routes = Router::new()
        .nest("/photos", photo_routes)
        .nest("/logout", logout_routes)
        .layer(middleware::from_fn_with_state(
            gate,
            session_middleware::<A>,
        ));

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route(
            "/login",
            get(login_page_handler).post(login_submit_handler::<A, S>),
        )
        .route(
            "/signup",
            get(signup_page_handler).post(signup_submit_handler::<A, S>),
        )
        .route("/auth/confirm", get(confirm_handler::<A, S>))
        .with_state(app_state);

    // Combine routes
    let router = Router::new()
        .merge(gated_routes)
        .merge(public_routes)
        .layer(cors);

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            // Parse origins into HeaderValues
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
