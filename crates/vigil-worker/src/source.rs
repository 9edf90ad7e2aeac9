use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;
use vigil_core::models::QueuedTicket;
use vigil_db::TicketRepository;

/// Queue operations used by the worker pool.
#[async_trait]
pub trait TicketSource: Send + Sync {
    async fn claim_next(&self, visibility_timeout_secs: i64) -> Result<Option<QueuedTicket>>;

    async fn complete(&self, ticket_id: Uuid) -> Result<()>;

    async fn release(&self, ticket_id: Uuid, error: &str) -> Result<()>;

    async fn poison(&self, ticket_id: Uuid, error: &str) -> Result<()>;
}

#[async_trait]
impl TicketSource for TicketRepository {
    async fn claim_next(&self, visibility_timeout_secs: i64) -> Result<Option<QueuedTicket>> {
        TicketRepository::claim_next(self, visibility_timeout_secs).await
    }

    async fn complete(&self, ticket_id: Uuid) -> Result<()> {
        TicketRepository::complete(self, ticket_id).await
    }

    async fn release(&self, ticket_id: Uuid, error: &str) -> Result<()> {
        TicketRepository::release(self, ticket_id, error).await
    }

    async fn poison(&self, ticket_id: Uuid, error: &str) -> Result<()> {
        TicketRepository::poison(self, ticket_id, error).await
    }
}
