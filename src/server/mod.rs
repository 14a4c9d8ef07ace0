//! HTTP server layer for the photo share app.
//!
//! This module provides the server-rendered web UI: auth screens, the
//! session gate, and the gallery.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     /login  /signup  /auth/confirm  │  /photos  /logout         │
//! │                                     │  (session gate)           │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │   session   │  │   pages / routes        │  │
//! │  │ (requests)  │  │   (gate)    │  │   (HTML, router)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod session;

pub use handlers::{
    capture_handler, confirm_handler, delete_handler, gallery_handler, health_handler,
    index_handler, login_page_handler, login_submit_handler, logout_handler, signup_page_handler,
    signup_submit_handler, upload_handler, AppState, CaptureForm, ConfirmParams, GalleryQuery,
    HealthResponse, LoginForm, SignupForm,
};
pub use pages::GalleryPhoto;
pub use routes::{create_router, RouterConfig, MAX_UPLOAD_BYTES};
pub use session::{session_middleware, CurrentUser, SessionGate, SessionToken};
