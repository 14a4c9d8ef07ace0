//! HTTP request handlers for the photo gallery and auth screens.
//!
//! # Endpoints
//!
//! - `GET  /` - Redirect to the gallery
//! - `GET  /health` - Health check
//! - `GET  /login`, `POST /login` - Login screen and submission
//! - `GET  /signup`, `POST /signup` - Signup screen and submission
//! - `GET  /auth/confirm` - Email confirmation via OTP token
//! - `GET  /photos` - Gallery listing (gated)
//! - `POST /photos/upload` - Multipart photo upload (gated)
//! - `POST /photos/capture` - Camera capture as a data URL (gated)
//! - `POST /photos/{key}/delete` - Delete a photo (gated)
//! - `POST /logout` - Sign out (gated)
//!
//! Failure policy follows the product: log the provider-reported error,
//! surface a UI string where the screen has one, take no corrective
//! action. A failed upload or delete leaves the listing untouched.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::auth::{AuthProvider, SessionCookie};
use crate::photo::{decode_image_data_url, extension_for_mime, photo_key, unix_millis};
use crate::storage::{content_type_for, PhotoStore};

use super::pages::{self, GalleryPhoto};
use super::session::{CurrentUser, SessionToken};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<A: AuthProvider, S: PhotoStore> {
    /// The auth provider client
    pub provider: Arc<A>,

    /// The photo store
    pub store: Arc<S>,

    /// Session cookie sealer
    pub cookies: SessionCookie,
}

impl<A: AuthProvider, S: PhotoStore> AppState<A, S> {
    /// Create a new application state.
    pub fn new(provider: Arc<A>, store: Arc<S>, cookies: SessionCookie) -> Self {
        Self {
            provider,
            store,
            cookies,
        }
    }
}

impl<A: AuthProvider, S: PhotoStore> Clone for AppState<A, S> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            store: Arc::clone(&self.store),
            cookies: self.cookies.clone(),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form fields.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Query parameters on the confirmation link from the signup email.
#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Camera capture form: a PNG data URL produced by the gallery page script.
#[derive(Debug, Deserialize)]
pub struct CaptureForm {
    pub data_url: String,
}

/// Query parameters on the gallery page (flash error codes from redirects).
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Fixed error string shown on failed logins. The provider's specific
/// error is only logged, never surfaced.
pub const LOGIN_ERROR_MESSAGE: &str = "Invalid login credentials";

/// Error shown when the confirmation link lacks its token.
pub const MISSING_TOKEN_MESSAGE: &str = "Invalid or missing confirmation token.";

/// Map a flash error code from a redirect back to its UI string.
fn flash_message(code: &str) -> Option<&'static str> {
    match code {
        "upload_failed" => Some("Upload failed. Please try again."),
        "capture_failed" => Some("Could not save the captured photo."),
        "delete_failed" => Some("Delete failed. Please try again."),
        "list_failed" => Some("Could not load your photos."),
        _ => None,
    }
}

/// 303 redirect, optionally setting a cookie.
fn see_other(location: &str, set_cookie: Option<String>) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, location);

    if let Some(cookie) = set_cookie {
        builder = builder.header(header::SET_COOKIE, cookie);
    }

    builder.body(Body::empty()).unwrap()
}

// =============================================================================
// Plain Handlers
// =============================================================================

/// Redirect the root path to the gallery. The session gate takes it from
/// there for unauthenticated visitors.
pub async fn index_handler() -> Redirect {
    Redirect::to("/photos")
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Auth Screen Handlers
// =============================================================================

/// Render the login page.
pub async fn login_page_handler() -> Html<String> {
    Html(pages::login_page(None))
}

/// Handle a login submission.
///
/// Success sets the session cookie and redirects to `/photos`. Failure
/// logs the provider's error and re-renders the page with the fixed
/// generic message.
pub async fn login_submit_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.provider.sign_in(&form.email, &form.password).await {
        Ok(session) => {
            info!(user_id = %session.user.id, "Login succeeded");
            see_other("/photos", Some(state.cookies.set_header(&session.access_token)))
        }
        Err(e) => {
            error!("Login failed: {}", e);
            Html(pages::login_page(Some(LOGIN_ERROR_MESSAGE))).into_response()
        }
    }
}

/// Render the signup page.
pub async fn signup_page_handler() -> Html<String> {
    Html(pages::signup_page(None))
}

/// Handle a signup submission.
///
/// The display name is attached as signup metadata. Success redirects to
/// `/login`; failure re-renders with the provider's raw error message.
pub async fn signup_submit_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    Form(form): Form<SignupForm>,
) -> Response {
    match state
        .provider
        .sign_up(&form.email, &form.password, &form.name)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "Signup succeeded");
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            error!("Signup failed: {}", e);
            Html(pages::signup_page(Some(&e.to_string()))).into_response()
        }
    }
}

/// Handle the email confirmation link.
///
/// # Endpoint
///
/// `GET /auth/confirm?token=<otp>&email=<address>`
///
/// A missing token shows an error page; a provider failure shows the
/// provider's message; success redirects to `/login`.
pub async fn confirm_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    Query(params): Query<ConfirmParams>,
) -> Response {
    let token = match params.token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return Html(pages::confirm_error_page(MISSING_TOKEN_MESSAGE)).into_response(),
    };

    let email = params.email.as_deref().unwrap_or_default();

    match state.provider.verify_otp(email, token).await {
        Ok(()) => Redirect::to("/login").into_response(),
        Err(e) => {
            error!("Email confirmation failed: {}", e);
            Html(pages::confirm_error_page(&e.to_string())).into_response()
        }
    }
}

/// Handle logout: best-effort provider sign-out, then clear the cookie.
pub async fn logout_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Response {
    if let Err(e) = state.provider.sign_out(&token).await {
        // The cookie is cleared regardless; a lingering provider session
        // only means the token outlives the browser's copy of it.
        warn!("Provider sign-out failed: {}", e);
    }

    see_other("/login", Some(state.cookies.clear_header()))
}

// =============================================================================
// Gallery Handlers
// =============================================================================

/// Render the gallery.
///
/// # Endpoint
///
/// `GET /photos` (gated)
///
/// Lists the whole bucket, filters the placeholder sentinel, and renders
/// each photo through its public URL. A listing failure is logged and
/// renders an empty gallery with an error string.
pub async fn gallery_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<GalleryQuery>,
) -> Html<String> {
    let mut flash = query.error.as_deref().and_then(flash_message);

    let photos = match state.store.list().await {
        Ok(objects) => objects
            .into_iter()
            .filter(|obj| !obj.is_placeholder())
            .map(|obj| GalleryPhoto {
                url: state.store.public_url(&obj.key),
                delete_path: format!("/photos/{}/delete", urlencoding::encode(&obj.key)),
                name: obj.name,
            })
            .collect(),
        Err(e) => {
            error!("Listing photos failed: {}", e);
            flash = flash.or_else(|| flash_message("list_failed"));
            Vec::new()
        }
    };

    Html(pages::gallery_page(user.display_name(), &photos, flash))
}

/// Handle a multipart photo upload.
///
/// # Endpoint
///
/// `POST /photos/upload` (gated)
///
/// The stored key is `<unix-millis>.<original-extension>`. A submission
/// without a selected file redirects back unchanged; an upload failure
/// logs and redirects back with an error flash.
pub async fn upload_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    multipart: Multipart,
) -> Response {
    let (file_name, data) = match read_photo_field(multipart).await {
        Ok(Some(found)) => found,
        // No file selected; the form requires one, so just bounce back.
        Ok(None) => return see_other("/photos", None),
        Err(message) => {
            warn!("Rejected upload body: {}", message);
            return see_other("/photos?error=upload_failed", None);
        }
    };

    let key = photo_key(&file_name, unix_millis());
    store_photo(&state, &key, data, "upload_failed").await
}

/// Pull the `photo` file field out of the multipart body.
///
/// Returns `Ok(None)` when the field is absent or empty.
async fn read_photo_field(mut multipart: Multipart) -> Result<Option<(String, Bytes)>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        if field.name() != Some("photo") {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };

        let data = field.bytes().await.map_err(|e| e.to_string())?;
        if data.is_empty() {
            return Ok(None);
        }

        return Ok(Some((file_name, data)));
    }

    Ok(None)
}

/// Handle a camera capture submission.
///
/// # Endpoint
///
/// `POST /photos/capture` (gated)
///
/// The body carries the canvas-encoded PNG data URL; it is decoded and
/// follows the same upload path as a picked file.
pub async fn capture_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    Form(form): Form<CaptureForm>,
) -> Response {
    let decoded = match decode_image_data_url(&form.data_url) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Rejected capture payload: {}", e);
            return see_other("/photos?error=capture_failed", None);
        }
    };

    let key = format!("{}.{}", unix_millis(), extension_for_mime(&decoded.mime));
    store_photo(&state, &key, decoded.data, "capture_failed").await
}

/// Upload bytes under a key and redirect back to the gallery, flashing
/// `error_code` on failure. The failed operation does not touch the
/// listing.
async fn store_photo<A: AuthProvider, S: PhotoStore>(
    state: &AppState<A, S>,
    key: &str,
    data: Bytes,
    error_code: &str,
) -> Response {
    let content_type = content_type_for(&data, key);

    match state.store.upload(key, content_type, data).await {
        Ok(()) => {
            info!(key = %key, "Photo stored");
            see_other("/photos", None)
        }
        Err(e) => {
            error!(key = %key, "Storing photo failed: {}", e);
            see_other(&format!("/photos?error={}", error_code), None)
        }
    }
}

/// Handle a photo deletion.
///
/// # Endpoint
///
/// `POST /photos/{key}/delete` (gated)
pub async fn delete_handler<A: AuthProvider, S: PhotoStore>(
    State(state): State<AppState<A, S>>,
    Path(key): Path<String>,
) -> Response {
    match state.store.remove(&key).await {
        Ok(()) => {
            info!(key = %key, "Photo deleted");
            see_other("/photos", None)
        }
        Err(e) => {
            error!(key = %key, "Deleting photo failed: {}", e);
            see_other("/photos?error=delete_failed", None)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
