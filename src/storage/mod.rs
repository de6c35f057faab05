//! Storage Module
//!
//! Persistent storage layer: immutable sorted tables plus the manifest that
//! orders them.
//!
//! ## Responsibilities
//! - Persist memtable snapshots to disk in sorted order
//! - Point lookups by linear scan of a table
//! - Record table creation order durably for recovery
//!
//! Compaction, bloom filters and range scans are not part of this layer.

mod manifest;
mod sstable;

pub use manifest::Manifest;
pub use sstable::{
    parse_sequence, scan, sstable_file_name, write_sstable, KvPair, SSTable, SSTableBuilder,
    SSTableReader,
};
