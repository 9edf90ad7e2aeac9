//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use vigil_core::Config;
use vigil_infra::{init_telemetry, LogFormat};
use vigil_worker::TicketQueue;

use crate::state::AppState;

pub struct App {
    pub state: Arc<AppState>,
    pub router: axum::Router,
    pub ticket_queue: TicketQueue,
}

/// Validate configuration, then bring up telemetry, database, storage,
/// the ticket queue and the router.
pub async fn initialize_app(config: Config) -> Result<App> {
    config.validate().context("Configuration validation failed")?;

    let log_format = config
        .log_format()
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)?;
    init_telemetry(log_format, config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let connections = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let services::Services {
        state,
        ticket_queue,
    } = services::initialize_services(&config, connections, storage)?;

    let router = routes::setup_routes(&config, state.clone());

    Ok(App {
        state,
        router,
        ticket_queue,
    })
}
