//! Error types module
//!
//! Every failure that can reach an HTTP client is an `AppError`. Callers only
//! ever see a fixed message per variant; the source chain is for the logs.
//!
//! The `Database` variant carries a `sqlx::Error` only when the `sqlx` feature
//! is enabled; without it the variant holds a plain message.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Describes how an error is presented to a client.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message; never includes internal details.
    fn client_message(&self) -> &'static str;

    fn suggested_action(&self) -> Option<&'static str>;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Blob storage error: {0}")]
    Storage(String),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

impl AppError {
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::Internal { .. } => "Internal",
        }
    }

    /// Error message followed by its source chain, cut off after five causes.
    pub fn detailed_message(&self) -> String {
        let mut details = self.to_string();

        let causes = std::iter::successors(std::error::Error::source(self), |err| err.source());
        for (depth, cause) in causes.enumerate() {
            if depth == 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", cause));
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        500
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Could not record the upload",
            AppError::Storage(_) => "Could not store the image",
            AppError::Internal { .. } => "Internal server error",
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        Some("Retry the upload later")
    }
}
