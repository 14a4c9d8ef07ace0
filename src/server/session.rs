//! Session gate middleware.
//!
//! Sits in front of the gallery routes only. Each request is checked
//! against the auth provider; there is no caching of the result across
//! requests and no retry. Anything short of a verified session redirects
//! to `/login`:
//!
//! 1. Read the session cookie from the `Cookie` header.
//! 2. Verify the HMAC and recover the opaque access token.
//! 3. Ask the provider who the token belongs to.
//!
//! On success the current user and token are inserted into the request
//! extensions for the handlers downstream.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::auth::cookie::session_cookie_value;
use crate::auth::{AuthProvider, SessionCookie, User};
use crate::error::{CookieError, ProviderError};

// =============================================================================
// Extensions
// =============================================================================

/// The authenticated user, inserted by the session gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The session's access token, inserted by the session gate.
///
/// Carried so the logout handler can invalidate the session on the
/// provider side.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

// =============================================================================
// Gate State
// =============================================================================

/// State for the session gate middleware.
pub struct SessionGate<A: AuthProvider> {
    provider: Arc<A>,
    cookies: SessionCookie,
}

impl<A: AuthProvider> SessionGate<A> {
    /// Create a gate over the given provider and cookie sealer.
    pub fn new(provider: Arc<A>, cookies: SessionCookie) -> Self {
        Self { provider, cookies }
    }
}

impl<A: AuthProvider> Clone for SessionGate<A> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            cookies: self.cookies.clone(),
        }
    }
}

// =============================================================================
// Middleware
// =============================================================================

/// Why a request was bounced to the login page. Logged, never surfaced.
#[derive(Debug)]
enum GateRejection {
    Cookie(CookieError),
    Provider(ProviderError),
}

impl std::fmt::Display for GateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateRejection::Cookie(e) => write!(f, "cookie: {}", e),
            GateRejection::Provider(e) => write!(f, "provider: {}", e),
        }
    }
}

/// Axum middleware enforcing an active session on the gallery routes.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, Router};
/// use photo_share::server::session::{session_middleware, SessionGate};
///
/// let gate = SessionGate::new(provider, cookies);
/// let gated = Router::new()
///     .route("/", get(gallery_handler))
///     .layer(middleware::from_fn_with_state(gate, session_middleware::<P>));
/// ```
pub async fn session_middleware<A: AuthProvider>(
    State(gate): State<SessionGate<A>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Own the header before the provider call; holding a borrow of the
    // request body across the await would make this future !Send.
    let cookie_header = request
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    match authenticate(&gate, &cookie_header).await {
        Ok((user, token)) => {
            request.extensions_mut().insert(CurrentUser(user));
            request.extensions_mut().insert(SessionToken(token));
            next.run(request).await
        }
        Err(rejection) => {
            // Expired and absent sessions are routine; no session check is
            // cached, so this fires on every gated request without one.
            debug!(path = %request.uri().path(), "No active session ({})", rejection);
            Redirect::to("/login").into_response()
        }
    }
}

/// Resolve a request's `Cookie` header, if any, down to a verified user.
async fn authenticate<A: AuthProvider>(
    gate: &SessionGate<A>,
    cookie_header: &str,
) -> Result<(User, String), GateRejection> {
    let sealed = session_cookie_value(cookie_header).map_err(GateRejection::Cookie)?;
    let token = gate.cookies.open(sealed).map_err(GateRejection::Cookie)?;

    let user = gate
        .provider
        .get_user(&token)
        .await
        .map_err(GateRejection::Provider)?;

    Ok((user, token))
}

// =============================================================================
// Tests
// =============================================================================
