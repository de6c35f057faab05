//! SSTable Reader
//!
//! Loads an SSTable file fully and answers lookups by linear scan.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::KvError;

use super::KvPair;

/// A fully loaded SSTable
pub struct SSTableReader {
    path: PathBuf,
    entries: Vec<KvPair>,
}

impl SSTableReader {
    /// Open an SSTable for reading
    ///
    /// Reads and decodes the whole file. Errors distinguish a missing file
    /// (`Io` with `NotFound`) from a malformed one (`Serialization`).
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let entries: Vec<KvPair> = serde_json::from_slice(&data)?;

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Get a value by key. O(n), no index.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// All entries in file order (ascending by key)
    pub fn entries(&self) -> &[KvPair] {
        &self.entries
    }

    /// Get entry count
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Get the minimum key in this SSTable
    pub fn min_key(&self) -> Option<&str> {
        self.entries.first().map(|e| e.key.as_str())
    }

    /// Get the maximum key in this SSTable
    pub fn max_key(&self) -> Option<&str> {
        self.entries.last().map(|e| e.key.as_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Look up `key` in the SSTable at `path`
///
/// A missing, unreadable or malformed file answers `None`, exactly like a
/// table that does not hold the key. The underlying error is only logged.
pub fn scan(path: &Path, key: &str) -> Option<String> {
    match SSTableReader::open(path) {
        Ok(reader) => reader.get(key).map(str::to_owned),
        Err(KvError::Io(ref e)) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("SSTable {} is missing, treating as empty", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("SSTable {} unreadable, treating as empty: {}", path.display(), e);
            None
        }
    }
}
