//! Signed session cookie handling.
//!
//! The auth provider issues an opaque access token; the browser carries it
//! between requests in an HttpOnly cookie. The cookie value is the token
//! plus an HMAC-SHA256 signature:
//!
//! ```text
//! photo_session = {token}.{hex(HMAC-SHA256(secret, token))}
//! ```
//!
//! The application never interprets the token itself. The signature only
//! ensures that a tampered cookie is discarded locally instead of being
//! forwarded to the provider. Verification uses constant-time comparison.
//!
//! # Example
//!
//! ```rust
//! use photo_share::auth::SessionCookie;
//!
//! let cookies = SessionCookie::new("0123456789abcdef0123456789abcdef");
//! let value = cookies.seal("opaque-access-token");
//! assert_eq!(cookies.open(&value).unwrap(), "opaque-access-token");
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::CookieError;

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "photo_session";

/// Seals and opens the signed session cookie.
#[derive(Clone)]
pub struct SessionCookie {
    /// Secret key for HMAC computation
    secret_key: Vec<u8>,
}

impl SessionCookie {
    /// Create a new sealer with the given secret key.
    ///
    /// # Arguments
    ///
    /// * `secret_key` - The secret key used for HMAC computation. Should be
    ///   at least 32 bytes for security.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
        }
    }

    /// Produce the cookie value for an access token.
    pub fn seal(&self, token: &str) -> String {
        format!("{}.{}", token, self.compute_signature(token))
    }

    /// Verify a cookie value and return the access token inside it.
    pub fn open(&self, value: &str) -> Result<String, CookieError> {
        // The token may itself contain dots (JWTs do), so split on the last one.
        let (token, signature) = value.rsplit_once('.').ok_or(CookieError::Malformed)?;

        if token.is_empty() {
            return Err(CookieError::Malformed);
        }

        let provided_sig = hex::decode(signature).map_err(|_| CookieError::InvalidSignatureFormat)?;
        let expected_sig = hex::decode(self.compute_signature(token))
            .map_err(|_| CookieError::InvalidSignatureFormat)?;

        // Constant-time comparison
        if provided_sig.ct_eq(&expected_sig).into() {
            Ok(token.to_string())
        } else {
            Err(CookieError::InvalidSignature)
        }
    }

    /// Build the `Set-Cookie` header value that stores a session token.
    pub fn set_header(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE_NAME,
            self.seal(token)
        )
    }

    /// Build the `Set-Cookie` header value that clears the session.
    pub fn clear_header(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            SESSION_COOKIE_NAME
        )
    }

    /// Compute the hex-encoded HMAC-SHA256 signature for a token.
    fn compute_signature(&self, token: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Extract the session cookie value from a `Cookie` request header.
///
/// Returns the raw (still sealed) cookie value, or `CookieError::Missing`
/// if the header has no session cookie.
pub fn session_cookie_value(cookie_header: &str) -> Result<&str, CookieError> {
    for pair in cookie_header.split(';') {
        let pair = pair.trim();
        if let Some((name, value)) = pair.split_once('=') {
            if name == SESSION_COOKIE_NAME {
                return Ok(value);
            }
        }
    }
    Err(CookieError::Missing)
}

// =============================================================================
// Tests
// =============================================================================
