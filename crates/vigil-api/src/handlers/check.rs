//! Upload screening endpoints
//!
//! Responses carry no body: `200` when the image was stored and forwarded,
//! `400` when it was rejected.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use bytes::Bytes;

use crate::error::HttpAppError;
use crate::services::CheckOutcome;
use crate::state::AppState;

/// Path user ids are restricted to ASCII letters.
pub fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.is_empty() && user_id.chars().all(|c| c.is_ascii_alphabetic())
}

pub async fn check_image(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    screen(&state, None, body).await
}

pub async fn check_image_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    // Same answer as an unmatched route.
    if !is_valid_user_id(&user_id) {
        return Ok(StatusCode::NOT_FOUND);
    }

    screen(&state, Some(&user_id), body).await
}

async fn screen(
    state: &AppState,
    user_id: Option<&str>,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    match state.ingress.check(user_id, body).await? {
        CheckOutcome::Accepted { .. } => Ok(StatusCode::OK),
        CheckOutcome::Rejected { .. } => Ok(StatusCode::BAD_REQUEST),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_must_be_alphabetic() {
        assert!(is_valid_user_id("alice"));
        assert!(is_valid_user_id("BobSmith"));
        assert!(!is_valid_user_id("alice123"));
        assert!(!is_valid_user_id("al-ice"));
        assert!(!is_valid_user_id(""));
        assert!(!is_valid_user_id("élodie"));
    }
}
