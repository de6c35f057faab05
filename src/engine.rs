//! Engine Module
//!
//! The core storage engine that coordinates all components.
//!
//! ## Responsibilities
//! - Coordinate MemTable, Manifest and SSTables
//! - Handle concurrent read/write access
//! - Trigger flushes when the MemTable reaches its threshold
//! - Serve reads freshest-first

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::memtable::MemTable;
use crate::storage::{scan, Manifest};

/// The main storage engine
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (put/flush): Serialized by `write_lock`
///   - The threshold check, the flush it may trigger and the insert form one
///     critical section, so two writers never both flush the same memtable
///
/// - **Reads** (get): No write_lock needed
///   - MemTable uses internal RwLock (many concurrent readers)
///   - Manifest hands out a snapshot of its table list
///   - A flush records the new table before it clears the memtable, so a
///     reader always finds a key in one place or the other
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Ordered record of SSTables
    manifest: Manifest,

    /// In-memory table for recent writes (internal RwLock)
    memtable: MemTable,

    /// Serializes write operations (put/flush)
    write_lock: Mutex<()>,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const MANIFEST_FILENAME: &'static str = "MANIFEST";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Open/create data directory
    /// 3. Load (or create) the manifest
    /// 4. Start with an empty memtable
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        fs::create_dir_all(&config.data_dir)?;

        let manifest = Manifest::load(&config.data_dir.join(Self::MANIFEST_FILENAME))?;

        tracing::info!(
            "Engine opened at {} ({} tables, flush threshold {})",
            config.data_dir.display(),
            manifest.table_count(),
            config.flush_threshold
        );

        Ok(Self {
            config,
            manifest,
            memtable: MemTable::new(),
            write_lock: Mutex::new(()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Get a value by key
    ///
    /// Search order:
    /// 1. MemTable (most recent writes)
    /// 2. SSTables (newest to oldest)
    ///
    /// A missing or corrupt SSTable reads as "not found".
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.memtable.get(key) {
            return Some(value);
        }

        for name in self.manifest.tables_newest_first() {
            if let Some(value) = scan(&self.manifest.table_path(&name), key) {
                return Some(value);
            }
        }

        None
    }

    /// Put a key-value pair
    ///
    /// Steps:
    /// 1. Acquire write lock
    /// 2. Flush first if the memtable is already at the threshold
    /// 3. Write to MemTable
    ///
    /// The check runs before the insert, so the memtable holds at most
    /// `flush_threshold` entries and the write after it fills triggers the
    /// flush. A failed flush aborts the put and leaves the memtable untouched.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        if self.memtable.len() >= self.config.flush_threshold {
            self.manifest.flush(&self.memtable)?;
        }

        self.memtable.put(key.to_string(), value.to_string());
        Ok(())
    }

    /// Flush memtable to disk (public API)
    ///
    /// Forces a flush regardless of memtable size; no-op when empty
    pub fn flush(&self) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        if self.memtable.is_empty() {
            tracing::debug!("Skipping flush of empty memtable");
            return Ok(());
        }

        self.manifest.flush(&self.memtable)?;
        Ok(())
    }

    /// Close the engine gracefully
    ///
    /// Flushes any pending data so nothing buffered is lost
    pub fn close(self) -> Result<()> {
        self.flush()?;
        tracing::info!("Engine closed ({} tables)", self.manifest.table_count());
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the manifest log path
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest.path().to_path_buf()
    }

    /// Get the memtable entry count
    pub fn memtable_len(&self) -> usize {
        self.memtable.len()
    }

    /// Get the approximate memtable size in bytes
    pub fn memtable_size(&self) -> usize {
        self.memtable.size()
    }

    /// Get the number of SSTables
    pub fn sstable_count(&self) -> usize {
        self.manifest.table_count()
    }

    /// SSTable names, oldest first
    pub fn tables(&self) -> Vec<String> {
        self.manifest.tables()
    }

    /// Highest SSTable sequence number handed out so far
    pub fn sequence(&self) -> u64 {
        self.manifest.counter()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
