//! HTTP request handlers and shared application state.

use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use bytes::Bytes;

use crate::engine::Engine;

use super::errors::ApiError;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// `GET /{key}`: the raw value, or 404 `key not found: {key}`
pub async fn get_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<String, ApiError> {
    let engine = Arc::clone(&state.engine);
    let lookup = key.clone();

    // SSTable scans are blocking file reads
    let value = tokio::task::spawn_blocking(move || engine.get(&lookup))
        .await
        .map_err(|e| ApiError::Internal(format!("lookup task failed: {}", e)))?;

    match value {
        Some(value) => Ok(value),
        None => {
            tracing::debug!("GET {} -> not found", key);
            Err(ApiError::NotFound(format!("key not found: {}", key)))
        }
    }
}

/// `POST /{key}`: store the request body as the value
pub async fn put_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<String, ApiError> {
    let body = body.map_err(|e| {
        tracing::debug!("POST {}: unreadable body: {}", key, e);
        ApiError::BadRequest("failed to read request body".to_string())
    })?;

    let value = String::from_utf8(body.to_vec()).map_err(|_| {
        tracing::debug!("POST {}: body is not UTF-8", key);
        ApiError::BadRequest("failed to read request body".to_string())
    })?;

    let engine = Arc::clone(&state.engine);
    let write_key = key.clone();

    // may flush the memtable to disk
    tokio::task::spawn_blocking(move || engine.put(&write_key, &value))
        .await
        .map_err(|e| ApiError::Internal(format!("write task failed: {}", e)))??;

    Ok(format!("stored value for key: {}", key))
}
