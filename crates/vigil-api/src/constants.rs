//! Application constants

/// Content type recorded for stored uploads; the body is opaque bytes.
pub const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Upper bound for the readiness database ping.
pub const READINESS_TIMEOUT_SECS: u64 = 5;

/// Maximum in-flight HTTP requests.
pub const HTTP_CONCURRENCY_LIMIT: usize = 1_000;
