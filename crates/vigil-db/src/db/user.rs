use anyhow::{Context, Result};

use super::connection::ConnectionProvider;

#[derive(Clone)]
pub struct UserRepository {
    connections: ConnectionProvider,
}

impl UserRepository {
    pub fn new(connections: ConnectionProvider) -> Self {
        Self { connections }
    }

    /// Sets `lockout_enabled` for the user. Returns the number of rows updated;
    /// an unknown id updates nothing and is not an error.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update"))]
    pub async fn lock_out(&self, user_id: &str) -> Result<u64> {
        let mut conn = self.connections.acquire().await?;

        let result = sqlx::query("UPDATE users SET lockout_enabled = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await
            .context("Failed to lock out user")?;

        let rows = result.rows_affected();
        if rows == 0 {
            tracing::warn!(user_id = %user_id, "Lockout requested for unknown user");
        } else {
            tracing::info!(user_id = %user_id, "User locked out");
        }

        Ok(rows)
    }
}
