use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;

/// Blobs kept under a directory that some web server exposes at `public_url`.
///
/// Writes go to a sibling temp file that is renamed into place, so a reader
/// never sees a partially written image.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalStorage {
    /// * `root` - directory holding the blobs (e.g. "/var/lib/vigil/blobs"), created if missing
    /// * `public_url` - URL the directory is served under (e.g. "http://localhost:7071/blobs")
    pub async fn new(root: impl Into<PathBuf>, public_url: String) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!("Cannot create blob root {}: {}", root.display(), e))
        })?;
        let root = fs::canonicalize(&root).await.map_err(|e| {
            StorageError::ConfigError(format!("Cannot resolve blob root {}: {}", root.display(), e))
        })?;

        tracing::info!(root = %root.display(), public_url = %public_url, "Local storage initialized");

        Ok(LocalStorage {
            root,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    /// Path for `key`, which must stay inside `root` even through symlinks.
    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        if !validate_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let path = self.root.join(key);
        if let Ok(real) = path.canonicalize() {
            if !real.starts_with(&self.root) {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
        }
        Ok(path)
    }

    async fn write_atomically(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let staging = path.with_extension(format!("{}.part", Uuid::new_v4().simple()));
        let result = async {
            let mut file = fs::File::create(&staging).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            fs::rename(&staging, path).await
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&staging).await;
        }
        result
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.resolve(storage_key)?;

        self.write_atomically(&path, &data).await.map_err(|e| {
            tracing::error!(error = %e, storage_key = %storage_key, "Local blob write failed");
            StorageError::UploadFailed(format!("{}: {}", storage_key, e))
        })?;

        tracing::debug!(storage_key = %storage_key, size_bytes = data.len(), "Blob written");
        Ok(format!("{}/{}", self.public_url, storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_image_key;
    use tempfile::TempDir;

    async fn storage() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:7071/blobs/".to_string())
            .await
            .unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_upload_writes_blob_and_returns_public_url() {
        let (dir, storage) = storage().await;
        let key = generate_image_key();

        let url = storage
            .upload_with_key(&key, Bytes::from_static(b"\x89PNG"), "application/octet-stream")
            .await
            .unwrap();

        assert_eq!(url, format!("http://localhost:7071/blobs/{}", key));
        assert_eq!(std::fs::read(dir.path().join(&key)).unwrap(), b"\x89PNG");
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_upload_leaves_no_staging_files() {
        let (dir, storage) = storage().await;
        let key = generate_image_key();

        storage
            .upload_with_key(&key, Bytes::from_static(b"img"), "application/octet-stream")
            .await
            .unwrap();

        let mut entries = std::fs::read_dir(dir.path().join("images")).unwrap();
        let only = entries.next().unwrap().unwrap();
        assert!(entries.next().is_none());
        assert_eq!(dir.path().join(&key).file_name(), Some(only.file_name().as_os_str()));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_content() {
        let (dir, storage) = storage().await;

        for body in [&b"first"[..], &b"second"[..]] {
            storage
                .upload_with_key("images/fixed", Bytes::copy_from_slice(body), "application/octet-stream")
                .await
                .unwrap();
        }

        assert_eq!(std::fs::read(dir.path().join("images/fixed")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_rejects_keys_outside_root() {
        let (_dir, storage) = storage().await;
        let result = storage
            .upload_with_key("../escape", Bytes::from_static(b"x"), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .upload_with_key("/etc/passwd", Bytes::from_static(b"x"), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
