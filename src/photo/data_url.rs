//! Decoding of `data:` URLs posted by the camera capture form.
//!
//! The capture page draws the current video frame to a canvas and encodes
//! it as a PNG data URL; the server turns that back into bytes:
//!
//! ```text
//! data:image/png;base64,iVBORw0KGgo...
//! ```
//!
//! Only base64-encoded image payloads are accepted.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;

use crate::error::DataUrlError;

/// An image decoded from a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Media type from the data URL header (e.g. "image/png")
    pub mime: String,

    /// Decoded image bytes
    pub data: Bytes,
}

/// Decode an image data URL into its media type and bytes.
pub fn decode_image_data_url(value: &str) -> Result<DecodedImage, DataUrlError> {
    let rest = value.strip_prefix("data:").ok_or(DataUrlError::Malformed)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::Malformed)?;

    let (mime, encoding) = match header.split_once(';') {
        Some((mime, encoding)) => (mime, Some(encoding)),
        None => (header, None),
    };

    match encoding {
        Some("base64") => {}
        Some(other) => return Err(DataUrlError::UnsupportedEncoding(other.to_string())),
        // Un-encoded payloads are text; a canvas never produces one.
        None => return Err(DataUrlError::UnsupportedEncoding("none".to_string())),
    }

    if !mime.starts_with("image/") {
        return Err(DataUrlError::NotAnImage(mime.to_string()));
    }

    let data = BASE64
        .decode(payload)
        .map_err(|e| DataUrlError::Base64(e.to_string()))?;

    Ok(DecodedImage {
        mime: mime.to_string(),
        data: Bytes::from(data),
    })
}

// =============================================================================
// Tests
// =============================================================================
