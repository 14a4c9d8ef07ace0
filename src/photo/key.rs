//! Storage key derivation for uploaded photos.
//!
//! Every upload is stored under `<unix-millis>.<ext>`, where the extension
//! comes from the original file name. Two uploads only collide when the
//! clock reads the same millisecond.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as Unix milliseconds.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Derive the storage key for an upload from its original file name.
///
/// The extension is lowercased; a name without an extension yields a
/// bare-timestamp key.
///
/// # Example
///
/// ```rust
/// use photo_share::photo::photo_key;
///
/// assert_eq!(photo_key("a.jpg", 1700000000000), "1700000000000.jpg");
/// assert_eq!(photo_key("IMG_0042.JPG", 1700000000000), "1700000000000.jpg");
/// assert_eq!(photo_key("noext", 1700000000000), "1700000000000");
/// ```
pub fn photo_key(original_name: &str, timestamp_millis: u64) -> String {
    match extension_of(original_name) {
        Some(ext) => format!("{}.{}", timestamp_millis, ext),
        None => timestamp_millis.to_string(),
    }
}

/// The lowercased extension of a file name, if it has one.
fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// File extension for an image media type, used for camera captures where
/// only the data URL's mime is known.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        // Canvas captures encode as PNG; default to that.
        _ => "png",
    }
}

// =============================================================================
// Tests
// =============================================================================
