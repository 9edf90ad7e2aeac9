//! Blob key generation shared by all backends.

use uuid::Uuid;

/// Container prefix for uploaded images.
pub const IMAGE_PREFIX: &str = "images";

/// Generate a fresh, unique key for an uploaded image: `images/{uuid}`.
pub fn generate_image_key() -> String {
    format!("{}/{}", IMAGE_PREFIX, Uuid::new_v4())
}

/// Rejects keys that could escape the storage root.
pub(crate) fn validate_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/')
}
