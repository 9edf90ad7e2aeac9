use anyhow::{Context, Result};
use sqlx::Postgres;
use uuid::Uuid;
use vigil_core::models::{QueuedTicket, Ticket};

use super::connection::ConnectionProvider;

/// PostgreSQL NOTIFY channel signalled whenever a ticket is published.
pub const TICKET_NOTIFY_CHANNEL: &str = "vigil_new_ticket";

/// Delay before a released ticket becomes visible again.
const RELEASE_DELAY_SECS: i64 = 5;

/// Ticket queue backed by the `tickets` table.
#[derive(Clone)]
pub struct TicketRepository {
    connections: ConnectionProvider,
}

impl TicketRepository {
    pub fn new(connections: ConnectionProvider) -> Self {
        Self { connections }
    }

    /// Enqueue a ticket and wake listening workers.
    #[tracing::instrument(skip(self, ticket), fields(image_url = %ticket.image_url))]
    pub async fn publish(&self, ticket: &Ticket) -> Result<Uuid> {
        let payload = ticket.to_json().context("Failed to serialize ticket")?;
        let id = Uuid::new_v4();

        let mut conn = self.connections.acquire().await?;

        sqlx::query(
            r#"
            INSERT INTO tickets (id, payload, status, dequeue_count, visible_at)
            VALUES ($1, $2, 'pending', 0, NOW())
            "#,
        )
        .bind(id)
        .bind(payload)
        .execute(&mut *conn)
        .await
        .context("Failed to insert ticket")?;

        // Sent only once the row is committed; inside a transaction a failed
        // notify would abort the insert. Workers still poll, so a lost notify
        // only delays pickup.
        if let Err(e) = sqlx::query("SELECT pg_notify($1, '')")
            .bind(TICKET_NOTIFY_CHANNEL)
            .execute(&mut *conn)
            .await
        {
            tracing::warn!(
                error = %e,
                ticket_id = %id,
                "Failed to send pg_notify for new ticket, workers will discover it via polling"
            );
        }

        tracing::info!(ticket_id = %id, "Ticket published");
        Ok(id)
    }

    /// Atomically claim the next visible ticket.
    ///
    /// Pending tickets whose `visible_at` has passed are eligible, as are
    /// running tickets whose lease expired (their worker died). Claiming bumps
    /// `dequeue_count` and hides the row for `visibility_timeout_secs`.
    #[tracing::instrument(skip(self))]
    pub async fn claim_next(&self, visibility_timeout_secs: i64) -> Result<Option<QueuedTicket>> {
        let mut conn = self.connections.acquire().await?;

        let ticket = sqlx::query_as::<Postgres, QueuedTicket>(
            r#"
            UPDATE tickets
            SET status = 'running',
                dequeue_count = dequeue_count + 1,
                visible_at = NOW() + make_interval(secs => $1),
                updated_at = NOW()
            WHERE id = (
                SELECT id
                FROM tickets
                WHERE status IN ('pending', 'running')
                    AND visible_at <= NOW()
                ORDER BY visible_at ASC, created_at ASC
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, payload, status, dequeue_count, visible_at, last_error, created_at, updated_at
            "#,
        )
        .bind(visibility_timeout_secs as f64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to claim next ticket")?;

        if let Some(ref ticket) = ticket {
            tracing::debug!(
                ticket_id = %ticket.id,
                dequeue_count = ticket.dequeue_count,
                "Ticket claimed"
            );
        }

        Ok(ticket)
    }

    /// Remove a successfully handled ticket.
    #[tracing::instrument(skip(self))]
    pub async fn complete(&self, ticket_id: Uuid) -> Result<()> {
        let mut conn = self.connections.acquire().await?;

        sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(ticket_id)
            .execute(&mut *conn)
            .await
            .context("Failed to delete ticket")?;

        Ok(())
    }

    /// Return a failed ticket to the queue for another attempt.
    #[tracing::instrument(skip(self, error))]
    pub async fn release(&self, ticket_id: Uuid, error: &str) -> Result<()> {
        let mut conn = self.connections.acquire().await?;

        sqlx::query(
            r#"
            UPDATE tickets
            SET status = 'pending',
                last_error = $2,
                visible_at = NOW() + make_interval(secs => $3),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .bind(error)
        .bind(RELEASE_DELAY_SECS as f64)
        .execute(&mut *conn)
        .await
        .context("Failed to release ticket")?;

        Ok(())
    }

    /// Park a ticket that exhausted its deliveries.
    #[tracing::instrument(skip(self, error))]
    pub async fn poison(&self, ticket_id: Uuid, error: &str) -> Result<()> {
        let mut conn = self.connections.acquire().await?;

        sqlx::query(
            r#"
            UPDATE tickets
            SET status = 'poison',
                last_error = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .bind(error)
        .execute(&mut *conn)
        .await
        .context("Failed to poison ticket")?;

        tracing::warn!(ticket_id = %ticket_id, error = %error, "Ticket moved to poison");
        Ok(())
    }
}
