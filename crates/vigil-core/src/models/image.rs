use serde::{Deserialize, Serialize};

/// A captioned image, as persisted in the `images` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub description: String,
    pub user_id: Option<String>,
}

impl ImageRecord {
    pub fn new(url: impl Into<String>, description: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
            user_id,
        }
    }
}
