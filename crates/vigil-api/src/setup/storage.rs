//! Blob storage setup

use std::sync::Arc;

use anyhow::{Context, Result};
use vigil_core::Config;
use vigil_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(backend = %storage.backend_type(), "Storage initialized");
    Ok(storage)
}
