//! Route configuration

pub mod health;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use vigil_core::Config;
use vigil_infra::request_id_middleware;

use crate::constants::HTTP_CONCURRENCY_LIMIT;
use crate::handlers::check::{check_image, check_image_for_user};
use crate::state::AppState;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    tracing::info!(
        max_upload_size_bytes = config.max_upload_size_bytes(),
        http_concurrency_limit = HTTP_CONCURRENCY_LIMIT,
        "Configuring routes"
    );
    build_router(state, config.max_upload_size_bytes())
}

/// Router with every middleware layer applied; uploads over
/// `max_upload_size_bytes` are refused with `413`.
pub fn build_router(state: Arc<AppState>, max_upload_size_bytes: usize) -> Router {
    Router::new()
        .route("/check", post(check_image))
        .route("/check/{user_id}", post(check_image_for_user))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(max_upload_size_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
