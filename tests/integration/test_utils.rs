//! Test utilities for integration tests.
//!
//! This module provides an in-memory photo store, a scripted auth provider,
//! and helpers for driving the router with tower's `oneshot`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::ServiceExt;

use photo_share::auth::{AuthProvider, Session, SessionCookie, User};
use photo_share::error::{ProviderError, StorageError};
use photo_share::server::{create_router, RouterConfig};
use photo_share::storage::{PhotoStore, StoredObject};

/// Cookie secret used by every test router.
pub const TEST_COOKIE_SECRET: &str = "integration-test-cookie-secret!!";

// =============================================================================
// In-Memory Photo Store
// =============================================================================

/// A photo store holding objects in memory, with switches to make each
/// operation fail on demand.
pub struct MemoryPhotoStore {
    objects: Mutex<BTreeMap<String, (String, Bytes)>>,
    fail_list: AtomicBool,
    fail_upload: AtomicBool,
    fail_remove: AtomicBool,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            fail_list: AtomicBool::new(false),
            fail_upload: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
        }
    }

    /// Pre-seed an object, as if uploaded earlier.
    pub fn with_object(self, key: impl Into<String>, content_type: &str, data: &[u8]) -> Self {
        self.objects.lock().unwrap().insert(
            key.into(),
            (content_type.to_string(), Bytes::copy_from_slice(data)),
        );
        self
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upload(&self, fail: bool) {
        self.fail_upload.store(fail, Ordering::SeqCst);
    }

    pub fn fail_remove(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }

    /// All stored keys, in listing order.
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Content type and bytes for a stored key.
    pub fn get(&self, key: &str) -> Option<(String, Bytes)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn list(&self) -> Result<Vec<StoredObject>, StorageError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StorageError::S3("simulated listing failure".to_string()));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, (_, data))| StoredObject::from_key(key.clone(), Some(data.len() as u64)))
            .collect())
    }

    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> Result<(), StorageError> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(StorageError::S3("simulated upload failure".to_string()));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), data));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(StorageError::S3("simulated delete failure".to_string()));
        }

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://photos.test/{}", key)
    }
}

// =============================================================================
// Scripted Auth Provider
// =============================================================================

/// An auth provider scripted with known accounts and tokens.
pub struct MockAuthProvider {
    accounts: HashMap<String, (String, User)>,
    tokens: Mutex<HashMap<String, User>>,
    otp_tokens: Vec<String>,
    signup_error: Option<(u16, String)>,
    signups: Mutex<Vec<String>>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            tokens: Mutex::new(HashMap::new()),
            otp_tokens: Vec::new(),
            signup_error: None,
            signups: Mutex::new(Vec::new()),
        }
    }

    /// Register an account that `sign_in` accepts.
    pub fn with_account(mut self, email: &str, password: &str, name: &str) -> Self {
        let user = User {
            id: format!("id-{}", email),
            email: email.to_string(),
            name: Some(name.to_string()),
        };
        self.accounts
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    /// Register an access token that `get_user` accepts.
    pub fn with_token(self, token: &str, user: User) -> Self {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), user);
        self
    }

    /// Register an OTP token that `verify_otp` accepts.
    pub fn with_otp(mut self, token: &str) -> Self {
        self.otp_tokens.push(token.to_string());
        self
    }

    /// Make every `sign_up` call fail with the given provider message.
    pub fn with_signup_error(mut self, status: u16, message: &str) -> Self {
        self.signup_error = Some((status, message.to_string()));
        self
    }

    /// Emails passed to `sign_up` so far.
    pub fn signups(&self) -> Vec<String> {
        self.signups.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError> {
        match self.accounts.get(email) {
            Some((expected, user)) if expected == password => {
                let token = format!("token-for-{}", user.id);
                self.tokens
                    .lock()
                    .unwrap()
                    .insert(token.clone(), user.clone());
                Ok(Session {
                    access_token: token,
                    user: user.clone(),
                })
            }
            _ => Err(ProviderError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, email: &str, _password: &str, _name: &str) -> Result<User, ProviderError> {
        if let Some((status, message)) = &self.signup_error {
            return Err(ProviderError::Provider {
                status: *status,
                message: message.clone(),
            });
        }

        self.signups.lock().unwrap().push(email.to_string());
        Ok(User {
            id: format!("id-{}", email),
            email: email.to_string(),
            name: None,
        })
    }

    async fn verify_otp(&self, _email: &str, token: &str) -> Result<(), ProviderError> {
        if self.otp_tokens.iter().any(|t| t == token) {
            Ok(())
        } else {
            Err(ProviderError::Provider {
                status: 403,
                message: "Token has expired or is invalid".to_string(),
            })
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<User, ProviderError> {
        self.tokens
            .lock()
            .unwrap()
            .get(access_token)
            .cloned()
            .ok_or(ProviderError::NoSession)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.tokens.lock().unwrap().remove(access_token);
        Ok(())
    }
}

// =============================================================================
// Router and Request Helpers
// =============================================================================

/// A default test user.
pub fn test_user() -> User {
    User {
        id: "u1".to_string(),
        email: "ada@example.com".to_string(),
        name: Some("Ada".to_string()),
    }
}

/// Build a router over the given provider and store, tracing disabled.
pub fn test_router(provider: Arc<MockAuthProvider>, store: Arc<MemoryPhotoStore>) -> Router {
    create_router(
        provider,
        store,
        RouterConfig::new(TEST_COOKIE_SECRET).with_tracing(false),
    )
}

/// A `Cookie` header value carrying a correctly sealed session for `token`.
pub fn session_cookie_header(token: &str) -> String {
    let sealed = SessionCookie::new(TEST_COOKIE_SECRET).seal(token);
    format!("photo_session={}", sealed)
}

/// URL-encode form fields into an `application/x-www-form-urlencoded` body.
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build a form POST request, optionally with a session cookie.
pub fn form_request(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::from(form_body(fields))).unwrap()
}

/// Build a GET request, optionally with a session cookie.
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::empty()).unwrap()
}

/// Build a multipart upload request for the `photo` field.
pub fn upload_request(file_name: &str, data: &[u8], cookie: &str) -> Request<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"photo\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/photos/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

/// Send a request through a clone of the router.
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// The `Set-Cookie` header of a response, if any.
pub fn set_cookie(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
}

/// Assert a 303 redirect to the given location.
pub fn assert_redirect(response: &Response<Body>, expected: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), expected);
}

/// Minimal but genuine PNG bytes (8x8 gray square).
pub fn tiny_png() -> Vec<u8> {
    use image::{GrayImage, Luma};
    use std::io::Cursor;

    let img = GrayImage::from_pixel(8, 8, Luma([128u8]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
