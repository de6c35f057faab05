//! MemTable implementation
//!
//! BTreeMap-based memtable with RwLock for concurrency.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::error::Result;
use crate::storage::{write_sstable, KvPair};

/// In-memory table for recent writes
pub struct MemTable {
    /// Live entries, ordered by key
    data: RwLock<BTreeMap<String, String>>,
    /// Approximate size in bytes (keys + values)
    size: AtomicUsize,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            size: AtomicUsize::new(0),
        }
    }

    /// Get a value by key (read lock)
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// Put a key-value pair, replacing any previous value (write lock)
    pub fn put(&self, key: String, value: String) {
        let mut data = self.data.write();
        let key_len = key.len();
        let value_len = value.len();

        match data.insert(key, value) {
            // key bytes were already counted
            Some(old) => {
                self.size.fetch_sub(old.len(), Ordering::Relaxed);
                self.size.fetch_add(value_len, Ordering::Relaxed);
            }
            None => {
                self.size.fetch_add(key_len + value_len, Ordering::Relaxed);
            }
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Get approximate size in bytes
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    /// Sorted copy of every entry
    pub fn snapshot(&self) -> Vec<KvPair> {
        Self::sorted_pairs(&self.data.read())
    }

    /// Write the current contents as an SSTable at `destination`, then clear
    ///
    /// The memtable is only cleared once the table is on disk; a failed write
    /// leaves every entry in place. Returns the number of entries flushed.
    pub fn flush(&self, destination: &Path) -> Result<usize> {
        self.flush_with(|pairs| write_sstable(pairs, destination).map(|_| ()))
    }

    /// Hand a sorted snapshot to `commit`, clearing only if it succeeds
    ///
    /// The write lock is held across `commit`, so no put lands between the
    /// snapshot and the clear.
    pub fn flush_with<F>(&self, commit: F) -> Result<usize>
    where
        F: FnOnce(&[KvPair]) -> Result<()>,
    {
        let mut data = self.data.write();
        let pairs = Self::sorted_pairs(&data);

        commit(&pairs)?;

        data.clear();
        self.size.store(0, Ordering::Relaxed);
        Ok(pairs.len())
    }

    fn sorted_pairs(data: &BTreeMap<String, String>) -> Vec<KvPair> {
        data.iter()
            .map(|(k, v)| KvPair::new(k.as_str(), v.as_str()))
            .collect()
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}
