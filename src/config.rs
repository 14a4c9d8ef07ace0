//! Configuration management for Photo Share.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `PHOTO_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the
//! `PHOTO_` prefix:
//!
//! - `PHOTO_HOST` - Server bind address (default: 0.0.0.0)
//! - `PHOTO_PORT` - Server port (default: 3000)
//! - `PHOTO_S3_BUCKET` - S3 bucket holding photos (default: photos)
//! - `PHOTO_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `PHOTO_S3_REGION` - AWS region (default: us-east-1)
//! - `PHOTO_PUBLIC_URL_BASE` - Base URL for publicly resolvable photo URLs
//! - `PHOTO_AUTH_URL` - Base URL of the auth provider REST API (required)
//! - `PHOTO_AUTH_API_KEY` - API key sent with every auth provider request
//! - `PHOTO_COOKIE_SECRET` - HMAC secret for the session cookie (required)
//! - `PHOTO_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use clap::Parser;
use url::Url;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default photo bucket name.
pub const DEFAULT_BUCKET: &str = "photos";

/// Minimum length for the session cookie secret, in bytes.
pub const MIN_COOKIE_SECRET_LEN: usize = 32;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Photo Share - a small photo-sharing web app.
///
/// Serves login/signup/gallery pages and delegates authentication to an
/// external auth provider and photo persistence to S3-compatible object
/// storage.
#[derive(Parser, Debug, Clone)]
#[command(name = "photo-share")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "PHOTO_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PHOTO_PORT")]
    pub port: u16,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// S3 bucket name holding the uploaded photos.
    #[arg(long, default_value = DEFAULT_BUCKET, env = "PHOTO_S3_BUCKET")]
    pub s3_bucket: String,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    ///
    /// If not specified, uses the default AWS S3 endpoint.
    #[arg(long, env = "PHOTO_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "PHOTO_S3_REGION")]
    pub s3_region: String,

    /// Base URL under which stored objects are publicly resolvable.
    ///
    /// Photo URLs are `{base}/{key}`. If not specified, the virtual-hosted
    /// S3 URL for the bucket and region is used.
    #[arg(long, env = "PHOTO_PUBLIC_URL_BASE")]
    pub public_url_base: Option<String>,

    // =========================================================================
    // Auth Provider Configuration
    // =========================================================================
    /// Base URL of the auth provider REST API.
    #[arg(long, env = "PHOTO_AUTH_URL")]
    pub auth_url: String,

    /// API key sent with every auth provider request.
    #[arg(long, env = "PHOTO_AUTH_API_KEY")]
    pub auth_api_key: Option<String>,

    /// Secret key for HMAC-SHA256 signing of the session cookie.
    ///
    /// Must be at least 32 bytes. The server fails to start without it.
    #[arg(long, env = "PHOTO_COOKIE_SECRET")]
    pub cookie_secret: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "PHOTO_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.s3_bucket.is_empty() {
            return Err(
                "S3 bucket name is required. Set --s3-bucket or PHOTO_S3_BUCKET".to_string(),
            );
        }

        if Url::parse(&self.auth_url).is_err() {
            return Err(format!(
                "Auth provider URL '{}' is not a valid URL. Set --auth-url or PHOTO_AUTH_URL",
                self.auth_url
            ));
        }

        if self.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(format!(
                "Cookie secret must be at least {} bytes. \
                 Set --cookie-secret or PHOTO_COOKIE_SECRET",
                MIN_COOKIE_SECRET_LEN
            ));
        }

        if let Some(ref base) = self.public_url_base {
            if Url::parse(base).is_err() {
                return Err(format!("Public URL base '{}' is not a valid URL", base));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
