//! Blob storage seam shared by the S3 and local backends

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::StorageBackend;

/// Failures from a blob backend. Messages name the key involved.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Blob upload failed: {0}")]
    UploadFailed(String),

    #[error("Rejected blob key: {0}")]
    InvalidKey(String),

    /// Unclassified failure reported by the backend SDK.
    #[error("Blob backend error: {0}")]
    BackendError(String),

    #[error("Storage misconfigured: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for vigil_core::AppError {
    fn from(err: StorageError) -> Self {
        vigil_core::AppError::Storage(err.to_string())
    }
}

/// Blob storage backend.
///
/// Keys are opaque, slash-separated paths such as `images/{uuid}`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload `data` under `storage_key` and return the absolute URL of the blob.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    fn backend_type(&self) -> StorageBackend;
}
