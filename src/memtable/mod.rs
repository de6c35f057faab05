//! MemTable Module
//!
//! In-memory data structure for recent writes.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Shared reads, exclusive writes and flushes
//! - Track entry count for the flush trigger
//! - Hand a sorted snapshot to the SSTable writer, then reset
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in RwLock:
//! - Ordered keys, so a flush snapshot needs no extra sort
//! - No tombstones: every entry is a live value

mod table;

pub use table::MemTable;
