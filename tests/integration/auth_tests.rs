//! Login, signup, and email confirmation flow tests.
//!
//! Tests verify:
//! - Successful login sets the session cookie and redirects to the gallery
//! - Failed login shows only the fixed generic message
//! - Signup redirects to login on success and surfaces provider errors raw
//! - Email confirmation handles valid, invalid, and missing tokens

use std::sync::Arc;

use axum::http::StatusCode;

use super::test_utils::{
    assert_redirect, body_string, form_request, get_request, send, set_cookie, test_router,
    MemoryPhotoStore, MockAuthProvider,
};

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_success_sets_cookie_and_redirects() {
    let provider = Arc::new(MockAuthProvider::new().with_account(
        "ada@example.com",
        "correct-horse",
        "Ada",
    ));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        form_request(
            "/login",
            &[("email", "ada@example.com"), ("password", "correct-horse")],
            None,
        ),
    )
    .await;

    assert_redirect(&response, "/photos");

    let cookie = set_cookie(&response).expect("login should set the session cookie");
    assert!(cookie.starts_with("photo_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_wrong_password_shows_generic_message() {
    let provider = Arc::new(MockAuthProvider::new().with_account(
        "ada@example.com",
        "correct-horse",
        "Ada",
    ));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        form_request(
            "/login",
            &[("email", "ada@example.com"), ("password", "wrong")],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());

    let body = body_string(response).await;
    assert!(body.contains("Invalid login credentials"));
}

#[tokio::test]
async fn test_login_unknown_email_shows_same_generic_message() {
    let provider = Arc::new(MockAuthProvider::new());
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        form_request(
            "/login",
            &[("email", "nobody@example.com"), ("password", "whatever")],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    // Same message whether the account exists or not
    let body = body_string(response).await;
    assert!(body.contains("Invalid login credentials"));
    assert!(!body.contains("nobody@example.com"));
}

#[tokio::test]
async fn test_login_page_renders() {
    let router = test_router(
        Arc::new(MockAuthProvider::new()),
        Arc::new(MemoryPhotoStore::new()),
    );

    let response = send(&router, get_request("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("name=\"email\""));
    assert!(body.contains("name=\"password\""));
}

// =============================================================================
// Signup
// =============================================================================

#[tokio::test]
async fn test_signup_success_redirects_to_login() {
    let provider = Arc::new(MockAuthProvider::new());
    let router = test_router(Arc::clone(&provider), Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        form_request(
            "/signup",
            &[
                ("name", "Grace"),
                ("email", "grace@example.com"),
                ("password", "hopper-tape"),
            ],
            None,
        ),
    )
    .await;

    assert_redirect(&response, "/login");
    assert_eq!(provider.signups(), vec!["grace@example.com".to_string()]);
}

#[tokio::test]
async fn test_signup_failure_shows_provider_message() {
    let provider = Arc::new(
        MockAuthProvider::new().with_signup_error(422, "User already registered"),
    );
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        form_request(
            "/signup",
            &[
                ("name", "Grace"),
                ("email", "grace@example.com"),
                ("password", "hopper-tape"),
            ],
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    // Unlike login, signup surfaces the provider's own message
    let body = body_string(response).await;
    assert!(body.contains("User already registered"));
}

#[tokio::test]
async fn test_signup_page_renders() {
    let router = test_router(
        Arc::new(MockAuthProvider::new()),
        Arc::new(MemoryPhotoStore::new()),
    );

    let response = send(&router, get_request("/signup", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("name=\"name\""));
    assert!(body.contains("name=\"email\""));
}

// =============================================================================
// Email Confirmation
// =============================================================================

#[tokio::test]
async fn test_confirm_valid_token_redirects_to_login() {
    let provider = Arc::new(MockAuthProvider::new().with_otp("otp-123456"));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        get_request(
            "/auth/confirm?token=otp-123456&email=grace%40example.com",
            None,
        ),
    )
    .await;

    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_confirm_missing_token_shows_error_page() {
    let router = test_router(
        Arc::new(MockAuthProvider::new()),
        Arc::new(MemoryPhotoStore::new()),
    );

    let response = send(&router, get_request("/auth/confirm", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Invalid or missing confirmation token."));
}

#[tokio::test]
async fn test_confirm_rejected_token_shows_provider_message() {
    let provider = Arc::new(MockAuthProvider::new().with_otp("otp-123456"));
    let router = test_router(provider, Arc::new(MemoryPhotoStore::new()));

    let response = send(
        &router,
        get_request("/auth/confirm?token=stale-token&email=grace%40example.com", None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Token has expired or is invalid"));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let router = test_router(
        Arc::new(MockAuthProvider::new()),
        Arc::new(MemoryPhotoStore::new()),
    );

    let response = send(&router, get_request("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}
