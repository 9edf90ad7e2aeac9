use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

/// S3 (or S3-compatible) storage
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3Storage {
    /// `endpoint_url` points at an S3-compatible store such as MinIO
    /// (e.g. "http://localhost:9000"); `None` talks to AWS.
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let client = build_client(&region, endpoint_url.as_deref()).await;

        tracing::info!(
            bucket = %bucket,
            region = %region,
            endpoint = ?endpoint_url,
            "S3 storage initialized"
        );

        Ok(S3Storage {
            client,
            bucket,
            region,
            endpoint_url,
        })
    }

    fn object_url(&self, key: &str) -> String {
        generate_url(self.endpoint_url.as_deref(), &self.bucket, &self.region, key)
    }
}

/// Client with adaptive retries (5 attempts). Custom endpoints use
/// path-style addressing, which MinIO and most S3-compatible stores require.
async fn build_client(region: &str, endpoint_url: Option<&str>) -> Client {
    let retry_config = RetryConfig::standard()
        .with_max_attempts(5)
        .with_retry_mode(RetryMode::Adaptive);

    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(RegionProviderChain::first_try(aws_config::Region::new(
            region.to_string(),
        )))
        .retry_config(retry_config.clone())
        .load()
        .await;

    let Some(endpoint) = endpoint_url else {
        return Client::new(&shared);
    };

    let mut builder = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(endpoint)
        .region(shared.region().cloned())
        .retry_config(retry_config)
        .force_path_style(true);
    if let Some(credentials) = shared.credentials_provider() {
        builder = builder.credentials_provider(credentials);
    }
    Client::from_conf(builder.build())
}

/// AWS: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
/// Custom endpoints: `{endpoint}/{bucket}/{key}`.
fn generate_url(endpoint: Option<&str>, bucket: &str, region: &str, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let size = data.len() as u64;
        let body = ByteStream::from(data);
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    storage_key = %storage_key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let url = self.object_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            storage_key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
