//! HTTP error responses.
//!
//! Handlers return [`ApiError`] so every error body has the same
//! `{"code": ..., "message": ...}` shape.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Domain failures of order ingestion.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OrderError {
    #[error("simulated failure for order {order_id}")]
    SimulatedFailure { order_id: i64 },
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::SimulatedFailure { .. } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "simulated_failure",
                err.to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_failure_is_a_server_error() {
        let api: ApiError = OrderError::SimulatedFailure { order_id: 50 }.into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.code, "simulated_failure");
        assert!(api.body.message.contains("50"));
    }
}
