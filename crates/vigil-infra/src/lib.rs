//! Vigil Infrastructure Library
//!
//! Shared infrastructure for the Vigil services:
//! - Middleware (request ID)
//! - Telemetry initialization

pub mod middleware;
pub mod telemetry;

pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_telemetry, LogFormat};
