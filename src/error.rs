//! Error types for json-echo.
//!
//! Every handler failure maps to a JSON `{"message": ...}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::{MessageResponse, PrettyJson};

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum EchoError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    BodyRead(String),
}

impl EchoError {
    pub fn status(&self) -> StatusCode {
        match self {
            EchoError::InvalidJson | EchoError::BodyRead(_) => StatusCode::BAD_REQUEST,
            EchoError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Client-facing message. Internal detail stays in the logs.
    pub fn message(&self) -> &'static str {
        match self {
            EchoError::InvalidJson => "Invalid JSON",
            EchoError::PayloadTooLarge { .. } => "Payload Too Large",
            EchoError::BodyRead(_) => "Unreadable request body",
        }
    }
}

impl IntoResponse for EchoError {
    fn into_response(self) -> Response {
        match &self {
            EchoError::InvalidJson => tracing::debug!("Rejected body that is not valid JSON"),
            EchoError::PayloadTooLarge { limit } => {
                tracing::warn!(limit = *limit, "Request body too large")
            }
            EchoError::BodyRead(e) => tracing::warn!(error = %e, "Failed to read request body"),
        }

        let body = MessageResponse {
            message: self.message().to_string(),
        };

        (self.status(), PrettyJson(body)).into_response()
    }
}

/// Result type alias for handler operations.
pub type EchoResult<T> = Result<T, EchoError>;
