use serde::{Deserialize, Serialize};

/// Queue message linking a stored image to the user that uploaded it.
///
/// The wire format uses PascalCase keys (`UserId`, `ImageUrl`). `UserId` is
/// left out for anonymous uploads and accepted as missing or `null` on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ticket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub image_url: String,
}

impl Ticket {
    pub fn new(user_id: Option<String>, image_url: impl Into<String>) -> Self {
        Self {
            user_id,
            image_url: image_url.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
