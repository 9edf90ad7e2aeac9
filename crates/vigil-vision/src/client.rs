use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use vigil_core::models::{ImageAnalysis, ImageDescription};

use crate::analyzer::ImageAnalyzer;
use crate::error::VisionError;
use crate::wire::{DescribeResponse, ErrorEnvelope};

const API_VERSION_PATH: &str = "vision/v3.2";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Computer Vision REST client
#[derive(Clone)]
pub struct VisionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl Debug for VisionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VisionClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl VisionClient {
    /// `endpoint` is the service base URL, e.g. `https://myvision.cognitiveservices.azure.com`.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, operation: &str) -> String {
        format!("{}/{}/{}", self.endpoint, API_VERSION_PATH, operation)
    }

    /// Turn a non-success response into `VisionError::Status`.
    async fn status_error(response: reqwest::Response) -> VisionError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (code, message) = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(ErrorEnvelope::into_parts)
            .unwrap_or_default();

        VisionError::Status {
            status: status.as_u16(),
            code,
            message: message.unwrap_or_else(|| {
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body
                }
            }),
        }
    }
}

#[async_trait]
impl ImageAnalyzer for VisionClient {
    async fn analyze_adult(&self, image: Bytes) -> Result<ImageAnalysis, VisionError> {
        let size = image.len();
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(self.url("analyze"))
            .query(&[("visualFeatures", "Adult")])
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let analysis: ImageAnalysis = response
            .json()
            .await
            .map_err(|e| VisionError::Decode(e.to_string()))?;

        tracing::debug!(
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            has_adult = analysis.adult.is_some(),
            "Image analysis completed"
        );

        Ok(analysis)
    }

    async fn describe_url(&self, image_url: &str) -> Result<ImageDescription, VisionError> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(self.url("describe"))
            .query(&[("maxCandidates", "1")])
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&json!({ "url": image_url }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: DescribeResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Decode(e.to_string()))?;

        let description = body.description.unwrap_or_default();

        tracing::debug!(
            image_url = %image_url,
            captions = description.captions.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image description completed"
        );

        Ok(description)
    }
}
