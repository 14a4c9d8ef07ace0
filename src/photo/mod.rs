//! Photo naming and capture payload handling.

mod data_url;
mod key;

pub use data_url::{decode_image_data_url, DecodedImage};
pub use key::{extension_for_mime, photo_key, unix_millis};
