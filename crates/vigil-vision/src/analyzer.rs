use async_trait::async_trait;
use bytes::Bytes;
use vigil_core::models::{ImageAnalysis, ImageDescription};

use crate::error::VisionError;

/// Image analysis operations the pipeline relies on.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Screen raw image bytes for adult, racy and gory content.
    async fn analyze_adult(&self, image: Bytes) -> Result<ImageAnalysis, VisionError>;

    /// Caption the image at `image_url`; at most one candidate is requested.
    async fn describe_url(&self, image_url: &str) -> Result<ImageDescription, VisionError>;
}
