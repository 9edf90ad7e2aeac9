//! Service wiring
//!
//! Collaborators are constructed here and handed to the ingress service and
//! the description handler as trait objects.

use std::sync::Arc;

use anyhow::{Context, Result};
use vigil_core::Config;
use vigil_db::{ConnectionProvider, ImageRepository, TicketRepository, UserRepository};
use vigil_storage::Storage;
use vigil_vision::{ImageAnalyzer, VisionClient};
use vigil_worker::{TicketQueue, TicketQueueConfig};

use crate::services::IngressService;
use crate::state::{AppState, DbState};
use crate::task_handlers::DescriptionHandler;

pub struct Services {
    pub state: Arc<AppState>,
    pub ticket_queue: TicketQueue,
}

pub fn initialize_services(
    config: &Config,
    connections: ConnectionProvider,
    storage: Arc<dyn Storage>,
) -> Result<Services> {
    let analyzer: Arc<dyn ImageAnalyzer> = Arc::new(
        VisionClient::new(config.vision_endpoint(), config.vision_api_key())
            .context("Failed to build vision client")?,
    );
    tracing::info!(endpoint = %config.vision_endpoint(), "Vision client initialized");

    let users = Arc::new(UserRepository::new(connections.clone()));
    let images = Arc::new(ImageRepository::new(connections.clone()));
    let tickets = Arc::new(TicketRepository::new(connections.clone()));

    let ingress = IngressService::new(
        analyzer.clone(),
        users,
        storage,
        tickets.clone(),
        config.analysis_failure_policy(),
    );

    let queue_config = TicketQueueConfig::from(config.queue().clone());
    tracing::info!(
        max_workers = queue_config.max_workers,
        poll_interval_ms = queue_config.poll_interval_ms,
        visibility_timeout_secs = queue_config.visibility_timeout_secs,
        max_dequeue_count = queue_config.max_dequeue_count,
        "Starting ticket queue"
    );
    let ticket_queue = TicketQueue::start(
        tickets,
        Arc::new(DescriptionHandler::new(analyzer, images)),
        queue_config,
        Some(connections.pool().clone()),
    );

    let state = Arc::new(AppState {
        ingress,
        db: DbState {
            pool: connections.pool().clone(),
        },
    });

    Ok(Services {
        state,
        ticket_queue,
    })
}
