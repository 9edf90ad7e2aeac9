//! Vigil Storage Library
//!
//! Blob storage abstraction with S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! Uploaded images are stored under `images/{uuid}`; the name is generated by
//! the server so client input never reaches a key. Keys must not contain `..`
//! or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::create_storage;
pub use keys::generate_image_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vigil_core::StorageBackend;
