//! Vigil Core Library
//!
//! This crate provides the domain models, the content policy, configuration and
//! error types shared by every Vigil component.

pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PipelineConfig, QueueSettings};
pub use error::{AppError, ErrorMetadata};
pub use policy::{is_inappropriate, AnalysisFailurePolicy};
pub use storage_types::StorageBackend;
