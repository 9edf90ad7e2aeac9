//! Application state shared by the HTTP handlers.

use sqlx::PgPool;

use crate::services::IngressService;

#[derive(Clone)]
pub struct AppState {
    pub ingress: IngressService,
    pub db: DbState,
}

/// Pool used by the readiness probe.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
}
