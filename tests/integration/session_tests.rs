//! Session gate tests.
//!
//! Tests verify:
//! - Gated routes redirect to /login without a valid session
//! - Tampered and stale cookies are rejected
//! - A valid cookie reaches the gallery
//! - Logout invalidates the provider session and clears the cookie

use std::sync::Arc;

use axum::http::StatusCode;

use super::test_utils::{
    assert_redirect, body_string, get_request, send, session_cookie_header, set_cookie,
    test_router, test_user, MemoryPhotoStore, MockAuthProvider,
};

#[tokio::test]
async fn test_gallery_requires_session() {
    let router = test_router(
        Arc::new(MockAuthProvider::new()),
        Arc::new(MemoryPhotoStore::new()),
    );

    let response = send(&router, get_request("/photos", None)).await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_root_redirects_to_gallery() {
    let router = test_router(
        Arc::new(MockAuthProvider::new()),
        Arc::new(MemoryPhotoStore::new()),
    );

    let response = send(&router, get_request("/", None)).await;
    assert_redirect(&response, "/photos");
}

#[tokio::test]
async fn test_valid_session_reaches_gallery() {
    let provider = Arc::new(MockAuthProvider::new().with_token("tok-1", test_user()));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let cookie = session_cookie_header("tok-1");
    let response = send(&router, get_request("/photos", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Ada"));
}

#[tokio::test]
async fn test_tampered_cookie_rejected() {
    let provider = Arc::new(MockAuthProvider::new().with_token("tok-1", test_user()));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    // Swap the token inside a correctly signed cookie
    let cookie = session_cookie_header("tok-1").replacen("tok-1", "tok-2", 1);
    let response = send(&router, get_request("/photos", Some(&cookie))).await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let provider = Arc::new(MockAuthProvider::new().with_token("tok-1", test_user()));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    // Correctly sealed, but the provider has never seen this token
    let cookie = session_cookie_header("tok-orphan");
    let response = send(&router, get_request("/photos", Some(&cookie))).await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_garbage_cookie_rejected() {
    let provider = Arc::new(MockAuthProvider::new().with_token("tok-1", test_user()));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        get_request("/photos", Some("photo_session=not-a-sealed-value")),
    )
    .await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let provider = Arc::new(MockAuthProvider::new().with_token("tok-1", test_user()));
    let router = test_router(Arc::clone(&provider), Arc::new(MemoryPhotoStore::new()));

    let cookie = session_cookie_header("tok-1");

    // Logout clears the cookie and bounces to the login page
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/logout")
        .header(axum::http::header::COOKIE, &cookie)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_redirect(&response, "/login");

    let cleared = set_cookie(&response).expect("logout should clear the cookie");
    assert!(cleared.contains("Max-Age=0"));

    // The provider forgot the token, so the old cookie is now useless
    let response = send(&router, get_request("/photos", Some(&cookie))).await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_logout_requires_session() {
    let router = test_router(
        Arc::new(MockAuthProvider::new()),
        Arc::new(MemoryPhotoStore::new()),
    );

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/logout")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_redirect(&response, "/login");
}
