//! Configuration module
//!
//! Settings are resolved once at startup from the process environment (after
//! loading an optional `.env` file) and are immutable afterwards.

use std::env;

use crate::policy::AnalysisFailurePolicy;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 7071;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const QUEUE_MAX_WORKERS: usize = 4;
const QUEUE_POLL_INTERVAL_MS: u64 = 1000;
const QUEUE_VISIBILITY_TIMEOUT_SECS: i64 = 300;
const QUEUE_MAX_DEQUEUE_COUNT: i32 = 5;
const BYTES_PER_MB: usize = 1024 * 1024;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    /// `pretty` or `json`
    pub log_format: String,
}

/// Ticket queue settings
#[derive(Clone, Debug)]
pub struct QueueSettings {
    pub max_workers: usize,
    pub poll_interval_ms: u64,
    /// How long a claimed ticket stays invisible to other workers.
    pub visibility_timeout_secs: i64,
    /// Tickets are parked as poison once they have been dequeued this many times.
    pub max_dequeue_count: i32,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            max_workers: QUEUE_MAX_WORKERS,
            poll_interval_ms: QUEUE_POLL_INTERVAL_MS,
            visibility_timeout_secs: QUEUE_VISIBILITY_TIMEOUT_SECS,
            max_dequeue_count: QUEUE_MAX_DEQUEUE_COUNT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Vision service
    pub vision_api_key: String,
    pub vision_endpoint: String,
    pub analysis_failure_policy: AnalysisFailurePolicy,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub max_upload_size_bytes: usize,
    pub queue: QueueSettings,
}

/// Parses `variable` when set. A value that does not parse is an error, not a
/// silent fallback to `default`.
fn parse_or<T, F>(lookup: &F, variable: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", variable, value)),
        None => Ok(default),
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: parse_or(&lookup, "PORT", SERVER_PORT)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: parse_or(&lookup, "DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            environment,
            log_format: lookup("LOG_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| "pretty".to_string()),
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let analysis_failure_policy = match lookup("ANALYSIS_FAILURE_POLICY") {
            Some(value) => value.parse::<AnalysisFailurePolicy>()?,
            None => AnalysisFailurePolicy::default(),
        };

        let max_upload_size_mb: usize =
            parse_or(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(BYTES_PER_MB)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let queue = QueueSettings {
            max_workers: parse_or(&lookup, "QUEUE_MAX_WORKERS", QUEUE_MAX_WORKERS)?,
            poll_interval_ms: parse_or(&lookup, "QUEUE_POLL_INTERVAL_MS", QUEUE_POLL_INTERVAL_MS)?,
            visibility_timeout_secs: parse_or(
                &lookup,
                "QUEUE_VISIBILITY_TIMEOUT_SECS",
                QUEUE_VISIBILITY_TIMEOUT_SECS,
            )?,
            max_dequeue_count: parse_or(
                &lookup,
                "QUEUE_MAX_DEQUEUE_COUNT",
                QUEUE_MAX_DEQUEUE_COUNT,
            )?,
        };

        Ok(Self {
            base,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            vision_api_key: lookup("VISION_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("VISION_API_KEY must be set"))?,
            vision_endpoint: lookup("VISION_ENDPOINT")
                .ok_or_else(|| anyhow::anyhow!("VISION_ENDPOINT must be set"))?
                .trim_end_matches('/')
                .to_string(),
            analysis_failure_policy,
            storage_backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION").or_else(|| lookup("AWS_REGION")),
            s3_endpoint: lookup("S3_ENDPOINT"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            max_upload_size_bytes,
            queue,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL cannot be empty"));
        }

        if self.vision_api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("VISION_API_KEY cannot be empty"));
        }

        if !(self.vision_endpoint.starts_with("http://")
            || self.vision_endpoint.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "VISION_ENDPOINT must be an http(s) URL, got '{}'",
                self.vision_endpoint
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.as_deref().map_or(true, |b| b.trim().is_empty()) {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when STORAGE_BACKEND=s3"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                    ));
                }
            }
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.queue.max_workers == 0 {
            return Err(anyhow::anyhow!("QUEUE_MAX_WORKERS must be greater than 0"));
        }

        if self.queue.max_dequeue_count < 1 {
            return Err(anyhow::anyhow!("QUEUE_MAX_DEQUEUE_COUNT must be at least 1"));
        }

        if self.queue.visibility_timeout_secs <= 0 {
            return Err(anyhow::anyhow!(
                "QUEUE_VISIBILITY_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if !matches!(self.base.log_format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                self.base.log_format
            ));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PipelineConfig>);

impl Config {
    fn as_pipeline(&self) -> &PipelineConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_pipeline().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PipelineConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_pipeline().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_pipeline().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_pipeline().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.as_pipeline().base.log_format
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_pipeline().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_pipeline().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.as_pipeline().database_url
    }

    pub fn vision_api_key(&self) -> &str {
        &self.as_pipeline().vision_api_key
    }

    pub fn vision_endpoint(&self) -> &str {
        &self.as_pipeline().vision_endpoint
    }

    pub fn analysis_failure_policy(&self) -> AnalysisFailurePolicy {
        self.as_pipeline().analysis_failure_policy
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_pipeline().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_pipeline().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_pipeline().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_pipeline().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_pipeline().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_pipeline().local_storage_base_url.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_pipeline().max_upload_size_bytes
    }

    pub fn queue(&self) -> &QueueSettings {
        &self.as_pipeline().queue
    }
}
