//! Ticket handler trait
//!
//! The API implements this for the description worker. Returning `Ok` deletes
//! the ticket; returning `Err` makes it eligible for redelivery until the
//! dequeue limit is reached.

use anyhow::Result;
use async_trait::async_trait;
use vigil_core::models::Ticket;

#[async_trait]
pub trait TicketHandler: Send + Sync {
    async fn handle(&self, ticket: Ticket) -> Result<()>;
}
