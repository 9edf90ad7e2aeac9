//! Database setup and initialization

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use vigil_core::Config;
use vigil_db::ConnectionProvider;

/// Connect the pool and apply pending migrations.
pub async fn setup_database(config: &Config) -> Result<ConnectionProvider> {
    tracing::info!("Connecting to database...");
    let connections = ConnectionProvider::connect(
        config.database_url(),
        config.db_max_connections(),
        Duration::from_secs(config.db_timeout_seconds()),
    )
    .await?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(connections.pool())
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(connections)
}
