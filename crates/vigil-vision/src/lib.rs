//! Vigil Vision
//!
//! Client for a Computer Vision style REST API. Two operations are used:
//! `analyze` with the `Adult` feature for screening uploads, and `describe`
//! for captioning stored images.

pub mod analyzer;
pub mod client;
pub mod error;
mod wire;

pub use analyzer::ImageAnalyzer;
pub use client::VisionClient;
pub use error::VisionError;
