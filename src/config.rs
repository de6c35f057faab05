//! Configuration for lsmkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvError, Result};

/// Default number of buffered entries that triggers a flush
pub const DEFAULT_FLUSH_THRESHOLD: usize = 2000;

/// Main configuration for an lsmkv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── MANIFEST          (append-only table log)
    ///     ├── MANIFEST.counter  (persisted sequence counter)
    ///     └── sst-N.json        (sorted tables)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // MemTable Configuration
    // -------------------------------------------------------------------------
    /// Entry count at which the next write flushes the memtable first
    pub flush_threshold: usize,

    // -------------------------------------------------------------------------
    // HTTP Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    /// Largest request body accepted as a value (bytes)
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./lsmkv_data"),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            listen_addr: "127.0.0.1:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.flush_threshold == 0 {
            return Err(KvError::Config(
                "flush_threshold must be at least 1".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(KvError::Config(
                "max_body_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the memtable flush threshold (entry count)
    pub fn flush_threshold(mut self, entries: usize) -> Self {
        self.config.flush_threshold = entries;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum request body size (in bytes)
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
