//! In-memory collaborators for service and handler tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;
use vigil_core::models::{
    AdultSignals, Caption, ImageAnalysis, ImageDescription, ImageRecord, Ticket,
};
use vigil_core::StorageBackend;
use vigil_db::{ImageStore, TicketPublisher, UserStore};
use vigil_storage::{Storage, StorageError, StorageResult};
use vigil_vision::{ImageAnalyzer, VisionError};

pub struct MockAnalyzer {
    analysis: Option<ImageAnalysis>,
    description: Option<ImageDescription>,
}

impl MockAnalyzer {
    pub fn clean() -> Self {
        Self::flagging(AdultSignals::default())
    }

    pub fn flagging(signals: AdultSignals) -> Self {
        Self {
            analysis: Some(ImageAnalysis {
                adult: Some(signals),
            }),
            description: None,
        }
    }

    pub fn without_adult() -> Self {
        Self {
            analysis: Some(ImageAnalysis { adult: None }),
            description: None,
        }
    }

    /// Every call fails with a service error.
    pub fn failing() -> Self {
        Self {
            analysis: None,
            description: None,
        }
    }

    pub fn describing(captions: &[&str]) -> Self {
        Self {
            analysis: None,
            description: Some(ImageDescription {
                captions: captions
                    .iter()
                    .map(|text| Caption {
                        text: text.to_string(),
                        confidence: 0.9,
                    })
                    .collect(),
                tags: Vec::new(),
            }),
        }
    }

    fn unavailable() -> VisionError {
        VisionError::Status {
            status: 503,
            code: Some("ServiceUnavailable".to_string()),
            message: "try later".to_string(),
        }
    }
}

#[async_trait]
impl ImageAnalyzer for MockAnalyzer {
    async fn analyze_adult(&self, _image: Bytes) -> Result<ImageAnalysis, VisionError> {
        self.analysis.clone().ok_or_else(Self::unavailable)
    }

    async fn describe_url(&self, _image_url: &str) -> Result<ImageDescription, VisionError> {
        self.description.clone().ok_or_else(Self::unavailable)
    }
}

#[derive(Default)]
pub struct MockUserStore {
    locked: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockUserStore {
    pub fn locked(&self) -> Vec<String> {
        self.locked.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn lock_out(&self, user_id: &str) -> anyhow::Result<u64> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset");
        }
        self.locked.lock().unwrap().push(user_id.to_string());
        Ok(1)
    }
}

#[derive(Default)]
pub struct MockImageStore {
    rows: Mutex<Vec<ImageRecord>>,
    fail: AtomicBool,
}

impl MockImageStore {
    pub fn rows(&self) -> Vec<ImageRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn insert(&self, record: &ImageRecord) -> anyhow::Result<i64> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("insert failed");
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(record.clone());
        Ok(rows.len() as i64)
    }
}

#[derive(Default)]
pub struct MockPublisher {
    published: Mutex<Vec<Ticket>>,
}

impl MockPublisher {
    pub fn published(&self) -> Vec<Ticket> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketPublisher for MockPublisher {
    async fn publish(&self, ticket: &Ticket) -> anyhow::Result<Uuid> {
        self.published.lock().unwrap().push(ticket.clone());
        Ok(Uuid::new_v4())
    }
}

#[derive(Default)]
pub struct MockStorage {
    uploads: Mutex<Vec<(String, Bytes)>>,
    fail: AtomicBool,
}

impl MockStorage {
    pub fn url_for(key: &str) -> String {
        format!("https://blobs.test/{}", key)
    }

    pub fn uploads(&self) -> Vec<(String, Bytes)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((storage_key.to_string(), data));
        Ok(Self::url_for(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
