use thiserror::Error;

/// Errors reported by the external authentication provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider rejected the credentials (wrong email/password).
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The provider returned a non-success status with a message.
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// The provider could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The provider responded with a body we could not parse.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// No session token was presented or the token was rejected.
    #[error("No active session")]
    NoSession,
}

/// Errors from the object storage backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Object not found
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The object key is empty or otherwise unusable
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
}

/// Errors from session cookie verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieError {
    /// No session cookie was present on the request
    #[error("Missing session cookie")]
    Missing,

    /// The cookie value does not have the `token.signature` shape
    #[error("Malformed session cookie")]
    Malformed,

    /// The signature is not valid hex
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// The signature does not match the token
    #[error("Invalid signature")]
    InvalidSignature,
}

/// Errors from decoding a `data:` URL submitted by the capture form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    /// The value does not start with `data:` or lacks the comma separator
    #[error("Malformed data URL")]
    Malformed,

    /// Only base64-encoded payloads are accepted
    #[error("Unsupported data URL encoding: {0}")]
    UnsupportedEncoding(String),

    /// The media type is not an image
    #[error("Unsupported media type: {0}")]
    NotAnImage(String),

    /// The payload is not valid base64
    #[error("Invalid base64 payload: {0}")]
    Base64(String),
}
