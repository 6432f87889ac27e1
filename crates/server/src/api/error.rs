//! Mapping of core outcomes onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hasher_core::AdmissionError;
use thiserror::Error;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path id is not an integer.
    #[error("Invalid ticket id: {0}")]
    InvalidTicketId(String),

    /// Unknown ticket or result not computed yet.
    #[error("Hash not found")]
    NotFound,

    /// Admission attempted after shutdown started.
    #[error("Service is shutting down")]
    ShuttingDown,

    /// Response body could not be encoded.
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidTicketId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> &'static str {
        match self {
            ApiError::InvalidTicketId(_) => "bad request",
            ApiError::NotFound => "hash not found",
            ApiError::ShuttingDown => "shutting down",
            ApiError::Encoding(_) => "encountered an error",
        }
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::ShuttingDown => ApiError::ShuttingDown,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Encoding(ref reason) = self {
            tracing::error!("Failed to encode response: {}", reason);
        }
        (self.status(), self.body()).into_response()
    }
}
