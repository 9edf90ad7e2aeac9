#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use vigil_core::Config;

#[allow(dead_code)]
fn required(value: Option<&str>, variable: &str) -> StorageResult<String> {
    value
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError(format!("{} is not set", variable)))
}

/// Build the blob store named by `STORAGE_BACKEND`.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend();
    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let storage = S3Storage::new(
                required(config.s3_bucket(), "S3_BUCKET")?,
                required(config.s3_region(), "S3_REGION or AWS_REGION")?,
                config.s3_endpoint().map(String::from),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(
                required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?,
                required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?,
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[allow(unreachable_patterns)]
        other => Err(StorageError::ConfigError(format!(
            "{} backend was not compiled in",
            other
        ))),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vigil_core::PipelineConfig;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let inner = PipelineConfig::from_source(|key| vars.get(key).cloned()).unwrap();
        Config(Box::new(inner))
    }

    const BASE: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/vigil"),
        ("VISION_API_KEY", "key"),
        ("VISION_ENDPOINT", "https://vision.test"),
    ];

    #[tokio::test]
    async fn test_local_backend_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let mut vars = BASE.to_vec();
        vars.extend([
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", path.as_str()),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:7071/blobs"),
        ]);

        let storage = create_storage(&config(&vars)).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_local_backend_requires_path() {
        let mut vars = BASE.to_vec();
        vars.push(("STORAGE_BACKEND", "local"));

        let err = create_storage(&config(&vars)).await.err().unwrap();
        assert!(matches!(err, StorageError::ConfigError(ref msg) if msg.contains("LOCAL_STORAGE_PATH")));
    }
}
