//! Error types for lsmkv
//!
//! Provides a unified error type for all engine operations.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for lsmkv operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for KvError {
    fn from(e: serde_json::Error) -> Self {
        KvError::Serialization(e.to_string())
    }
}
