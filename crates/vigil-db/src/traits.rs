//! Repository trait abstractions
//!
//! The orchestration layer depends on these narrow traits rather than the
//! concrete repositories, so it can be exercised without a database.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;
use vigil_core::models::{ImageRecord, Ticket};

use crate::db::{ImageRepository, TicketRepository, UserRepository};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Disable the user's account. Returns the number of rows updated.
    async fn lock_out(&self, user_id: &str) -> Result<u64>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn insert(&self, record: &ImageRecord) -> Result<i64>;
}

#[async_trait]
pub trait TicketPublisher: Send + Sync {
    async fn publish(&self, ticket: &Ticket) -> Result<Uuid>;
}

#[async_trait]
impl UserStore for UserRepository {
    async fn lock_out(&self, user_id: &str) -> Result<u64> {
        UserRepository::lock_out(self, user_id).await
    }
}

#[async_trait]
impl ImageStore for ImageRepository {
    async fn insert(&self, record: &ImageRecord) -> Result<i64> {
        ImageRepository::insert(self, record).await
    }
}

#[async_trait]
impl TicketPublisher for TicketRepository {
    async fn publish(&self, ticket: &Ticket) -> Result<Uuid> {
        TicketRepository::publish(self, ticket).await
    }
}
