//! SSTable Module
//!
//! Sorted String Table - immutable on-disk sorted key-value storage.
//!
//! ## File Format
//! ```text
//! [{"key":"a","value":"1"},{"key":"b","value":"2"}, ...]
//! ```
//! A single JSON array of key/value objects, sorted ascending by key with no
//! duplicates. Files are named `sst-{N}.json` where `N` is the 1-based
//! sequence number handed out by the manifest. There is no index or filter:
//! point lookups load the whole file and scan it.

mod builder;
mod reader;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use builder::{write_sstable, SSTableBuilder};
pub use reader::{scan, SSTableReader};

/// Filename prefix shared by every SSTable
pub(crate) const FILE_PREFIX: &str = "sst-";

/// Filename suffix shared by every SSTable
pub(crate) const FILE_SUFFIX: &str = ".json";

/// One record of an SSTable (and of a memtable snapshot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvPair {
    pub key: String,
    pub value: String,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// SSTable metadata returned once a table has been written
#[derive(Debug, Clone)]
pub struct SSTable {
    /// Path to the SSTable file
    pub path: PathBuf,
    /// Number of entries in this SSTable
    pub entry_count: u64,
    /// File size in bytes
    pub file_size: u64,
}

/// Filename for the SSTable with the given sequence number
/// 7 → "sst-7.json"
pub fn sstable_file_name(sequence: u64) -> String {
    format!("{}{}{}", FILE_PREFIX, sequence, FILE_SUFFIX)
}

/// Parse the sequence number out of an SSTable filename
/// "sst-42.json" → Some(42)
pub fn parse_sequence(name: &str) -> Option<u64> {
    name.strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?
        .parse()
        .ok()
}
