//! API error types mapped to HTTP status codes.
//!
//! Bodies are plain text, matching the success responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::KvError;

/// Request-level failure
///
/// - `BadRequest` → 400
/// - `NotFound` → 404
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read as a value.
    BadRequest(String),
    /// No value stored for the key.
    NotFound(String),
    /// Engine or runtime failure.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, message).into_response()
    }
}

impl From<KvError> for ApiError {
    fn from(e: KvError) -> Self {
        tracing::error!("Engine error: {}", e);
        ApiError::Internal(e.to_string())
    }
}
