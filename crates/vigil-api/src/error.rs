//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. The body only ever carries the
//! fixed client message for the variant; the full cause chain goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use vigil_core::{AppError, ErrorMetadata};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper giving `AppError` an axum `IntoResponse` impl (orphan rules).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl HttpAppError {
    fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.0.client_message().to_string(),
            code: self.0.error_code().to_string(),
            suggested_action: self.0.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        tracing::error!(
            error = %self.0,
            details = %self.0.detailed_message(),
            error_type = self.0.error_type(),
            "Request failed"
        );

        (status, Json(self.body())).into_response()
    }
}
