//! Ticket queue: worker pool, LISTEN/NOTIFY or polling, release and poison.
//!
//! Shutdown: [`TicketQueue::shutdown`] signals the pool to stop claiming; it does
//! not wait for in-flight tickets. A ticket interrupted mid-flight becomes
//! visible again once its lease expires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::time::sleep;
use vigil_core::models::{FailureDisposition, QueuedTicket};
use vigil_core::QueueSettings;
use vigil_db::TICKET_NOTIFY_CHANNEL;

use crate::handler::TicketHandler;
use crate::source::TicketSource;

#[derive(Clone, Debug)]
pub struct TicketQueueConfig {
    pub max_workers: usize,
    pub poll_interval_ms: u64,
    pub visibility_timeout_secs: i64,
    pub max_dequeue_count: i32,
}

impl Default for TicketQueueConfig {
    fn default() -> Self {
        QueueSettings::default().into()
    }
}

impl From<QueueSettings> for TicketQueueConfig {
    fn from(settings: QueueSettings) -> Self {
        Self {
            max_workers: settings.max_workers,
            poll_interval_ms: settings.poll_interval_ms,
            visibility_timeout_secs: settings.visibility_timeout_secs,
            max_dequeue_count: settings.max_dequeue_count,
        }
    }
}

/// How a claimed ticket was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Completed,
    Released,
    Poisoned,
}

pub struct TicketQueue {
    shutdown_tx: mpsc::Sender<()>,
}

impl TicketQueue {
    /// Start the worker pool.
    ///
    /// With `pool` set, workers also LISTEN on the ticket channel and wake as
    /// soon as a ticket is published; otherwise they only poll.
    pub fn start(
        source: Arc<dyn TicketSource>,
        handler: Arc<dyn TicketHandler>,
        config: TicketQueueConfig,
        pool: Option<sqlx::PgPool>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            Self::worker_pool(source, handler, config, shutdown_rx, pool).await;
        });

        Self { shutdown_tx }
    }

    async fn worker_pool(
        source: Arc<dyn TicketSource>,
        handler: Arc<dyn TicketHandler>,
        config: TicketQueueConfig,
        mut shutdown_rx: mpsc::Receiver<()>,
        pool: Option<sqlx::PgPool>,
    ) {
        tracing::info!(
            max_workers = config.max_workers,
            poll_interval_ms = config.poll_interval_ms,
            visibility_timeout_secs = config.visibility_timeout_secs,
            max_dequeue_count = config.max_dequeue_count,
            listen_notify = pool.is_some(),
            "Ticket queue worker pool started"
        );

        let semaphore = Arc::new(Semaphore::new(config.max_workers));
        let poll_interval = Duration::from_millis(config.poll_interval_ms);

        let (notify_tx, mut notify_rx) = mpsc::channel::<()>(16);
        let listener_task = pool.map(|pool| {
            let tx = notify_tx.clone();
            tokio::spawn(async move {
                loop {
                    match sqlx::postgres::PgListener::connect_with(&pool).await {
                        Ok(mut listener) => {
                            if let Err(e) = listener.listen(TICKET_NOTIFY_CHANNEL).await {
                                tracing::warn!(error = %e, "LISTEN failed, will retry");
                                sleep(Duration::from_secs(5)).await;
                                continue;
                            }
                            while listener.recv().await.is_ok() {
                                let _ = tx.try_send(());
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "PgListener connect failed, will retry");
                            sleep(Duration::from_secs(5)).await;
                        }
                    }
                }
            })
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Ticket queue worker pool shutting down");
                    break;
                }
                _ = notify_rx.recv() => {
                    Self::claim_and_dispatch(&source, &handler, &semaphore, &config).await;
                }
                _ = sleep(poll_interval) => {
                    Self::claim_and_dispatch(&source, &handler, &semaphore, &config).await;
                }
            }
        }

        if let Some(task) = listener_task {
            task.abort();
        }

        tracing::info!("Ticket queue worker pool stopped");
    }

    /// Claim tickets until the queue is empty or every worker is busy.
    /// Returns how many tickets were dispatched.
    async fn claim_and_dispatch(
        source: &Arc<dyn TicketSource>,
        handler: &Arc<dyn TicketHandler>,
        semaphore: &Arc<Semaphore>,
        config: &TicketQueueConfig,
    ) -> usize {
        let mut dispatched = 0;

        loop {
            let permit = match semaphore.clone().try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::debug!(dispatched, "No workers available, skipping claim");
                    return dispatched;
                }
            };

            match source.claim_next(config.visibility_timeout_secs).await {
                Ok(Some(ticket)) => {
                    let source = source.clone();
                    let handler = handler.clone();
                    let config = config.clone();

                    tokio::spawn(async move {
                        let _permit = permit;
                        if let Err(e) =
                            process_ticket(ticket, source.as_ref(), handler.as_ref(), &config)
                                .await
                        {
                            tracing::error!(error = %e, "Failed to settle ticket");
                        }
                    });
                    dispatched += 1;
                }
                Ok(None) => {
                    tracing::trace!(dispatched, "No tickets available in queue");
                    return dispatched;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim ticket from queue");
                    return dispatched;
                }
            }
        }
    }

    /// Signals the worker pool to stop claiming tickets. Returns immediately.
    pub async fn shutdown(&self) {
        tracing::info!("Initiating ticket queue shutdown");
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Run the handler for one claimed ticket and settle the row.
///
/// `Ok` from the handler deletes the ticket. A handler error or a lease
/// timeout releases it, or poisons it once `max_dequeue_count` deliveries
/// have been used. Payloads that do not decode are poisoned immediately.
#[tracing::instrument(
    skip(row, source, handler, config),
    fields(ticket_id = %row.id, dequeue_count = row.dequeue_count)
)]
pub async fn process_ticket(
    row: QueuedTicket,
    source: &dyn TicketSource,
    handler: &dyn TicketHandler,
    config: &TicketQueueConfig,
) -> anyhow::Result<Settlement> {
    if row.dequeue_count > config.max_dequeue_count {
        let error = format!(
            "Dequeue limit exceeded ({} > {})",
            row.dequeue_count, config.max_dequeue_count
        );
        source.poison(row.id, &error).await?;
        return Ok(Settlement::Poisoned);
    }

    let ticket = match row.ticket() {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::error!(error = %e, "Ticket payload is not a valid ticket");
            source
                .poison(row.id, &format!("Invalid ticket payload: {}", e))
                .await?;
            return Ok(Settlement::Poisoned);
        }
    };

    let start = std::time::Instant::now();
    let lease = Duration::from_secs(config.visibility_timeout_secs.max(1) as u64);

    let error = match tokio::time::timeout(lease, handler.handle(ticket)).await {
        Ok(Ok(())) => {
            source.complete(row.id).await?;
            tracing::info!(
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Ticket handled"
            );
            return Ok(Settlement::Completed);
        }
        Ok(Err(e)) => format!("{:#}", e),
        Err(_) => format!(
            "Ticket handling exceeded visibility timeout of {}s",
            config.visibility_timeout_secs
        ),
    };

    tracing::error!(
        error = %error,
        max_dequeue_count = config.max_dequeue_count,
        "Ticket handling failed"
    );

    match row.disposition_after_failure(config.max_dequeue_count) {
        FailureDisposition::Release => {
            source.release(row.id, &error).await?;
            Ok(Settlement::Released)
        }
        FailureDisposition::Poison => {
            source.poison(row.id, &error).await?;
            Ok(Settlement::Poisoned)
        }
    }
}
