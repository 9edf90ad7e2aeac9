use anyhow::{Context, Result};
use vigil_core::models::ImageRecord;

use super::connection::ConnectionProvider;

/// Repository for captioned images
#[derive(Clone)]
pub struct ImageRepository {
    connections: ConnectionProvider,
}

impl ImageRepository {
    pub fn new(connections: ConnectionProvider) -> Self {
        Self { connections }
    }

    /// Inserts a new image row and returns its id. No deduplication: inserting
    /// the same record twice yields two rows.
    #[tracing::instrument(
        skip(self, record),
        fields(db.table = "images", db.operation = "insert", image_url = %record.url)
    )]
    pub async fn insert(&self, record: &ImageRecord) -> Result<i64> {
        let mut conn = self.connections.acquire().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO images (url, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&record.url)
        .bind(&record.description)
        .bind(record.user_id.as_deref())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to insert image")?;

        tracing::debug!(image_id = id, "Image inserted");
        Ok(id)
    }
}
