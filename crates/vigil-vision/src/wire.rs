//! Response bodies of the vision REST API.

use serde::Deserialize;
use vigil_core::models::ImageDescription;

#[derive(Debug, Deserialize)]
pub(crate) struct DescribeResponse {
    #[serde(default)]
    pub description: Option<ImageDescription>,
}

/// Error envelope. Newer API versions nest the fields under `error`,
/// older ones put them at the top level.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        match self.error {
            Some(detail) => (detail.code, detail.message),
            None => (self.code, self.message),
        }
    }
}
