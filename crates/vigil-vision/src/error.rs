use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Vision request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Vision service returned {status}: {}", status_message(.code, .message))]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode vision response: {0}")]
    Decode(String),
}

fn status_message(code: &Option<String>, message: &str) -> String {
    match code {
        Some(code) => format!("[{}] {}", code, message),
        None => message.to_string(),
    }
}

impl VisionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            VisionError::Status { status, .. } => Some(*status),
            VisionError::Transport(e) => e.status().map(|s| s.as_u16()),
            VisionError::Decode(_) => None,
        }
    }
}
