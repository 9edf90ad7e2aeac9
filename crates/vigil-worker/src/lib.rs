//! Vigil Worker
//!
//! Runs a pool of workers over the PostgreSQL ticket queue and hands each
//! claimed ticket to a `TicketHandler`.

pub mod handler;
pub mod queue;
pub mod source;

pub use handler::TicketHandler;
pub use queue::{TicketQueue, TicketQueueConfig};
pub use source::TicketSource;
