//! Object storage layer.
//!
//! Photos live in a single fixed bucket on an S3-compatible service; the
//! storage service is the only source of truth. This module defines the
//! [`PhotoStore`] seam, the listed-object shape, and the helpers shared by
//! implementations (placeholder filtering, content-type sniffing).

mod s3_store;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;

pub use s3_store::{create_s3_client, S3PhotoStore};

// =============================================================================
// Constants
// =============================================================================

/// Sentinel object the storage provider keeps in otherwise-empty folders.
/// Never shown in the gallery.
pub const PLACEHOLDER_SENTINEL: &str = ".emptyFolderPlaceholder";

/// Content type used when sniffing and the key extension both fail.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// Types
// =============================================================================

/// A stored photo as returned by the listing operation.
///
/// Nothing beyond what the storage listing API provides: the object key
/// (which doubles as the identifier) and a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key within the bucket
    pub key: String,

    /// Display name (the final path segment of the key)
    pub name: String,

    /// Object size in bytes, when the listing reports it
    pub size: Option<u64>,
}

impl StoredObject {
    /// Create a stored object from its key, deriving the display name.
    pub fn from_key(key: impl Into<String>, size: Option<u64>) -> Self {
        let key = key.into();
        let name = key.rsplit('/').next().unwrap_or(&key).to_string();
        Self { key, name, size }
    }

    /// Whether this object is the provider's empty-folder placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_SENTINEL
    }
}

// =============================================================================
// PhotoStore Trait
// =============================================================================

/// Seam over the object storage provider.
///
/// Mirrors the four operations the gallery needs: list the bucket, upload
/// by key, remove by key, and resolve a public URL. `public_url` is
/// deterministic and makes no request.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// List every object in the photo bucket, placeholder entries included.
    async fn list(&self) -> Result<Vec<StoredObject>, StorageError>;

    /// Store an object under the given key.
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), StorageError>;

    /// Remove the object with the given key.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Deterministic, publicly resolvable URL for a stored key.
    fn public_url(&self, key: &str) -> String;
}

// =============================================================================
// Content Type Sniffing
// =============================================================================

/// Pick a content type for an upload: sniff the bytes first, then fall back
/// to the key extension, then to `application/octet-stream`.
pub fn content_type_for(data: &[u8], key: &str) -> &'static str {
    if let Ok(format) = image::guess_format(data) {
        return format.to_mime_type();
    }
    content_type_from_extension(key).unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Content type from a key's file extension, for the formats the gallery
/// realistically sees.
fn content_type_from_extension(key: &str) -> Option<&'static str> {
    let ext = key.rsplit('.').next()?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
