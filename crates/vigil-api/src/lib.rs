//! Vigil API Library
//!
//! HTTP ingress for image screening, the caption worker handler and the
//! application setup shared by the binary and the integration tests.

pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod task_handlers;

#[cfg(test)]
mod test_helpers;

pub use error::{ErrorResponse, HttpAppError};
pub use services::ingress::{CheckOutcome, IngressService};
pub use state::AppState;
pub use task_handlers::DescriptionHandler;
