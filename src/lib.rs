//! # lsmkv
//!
//! An embeddable log-structured key-value store with:
//! - A bounded in-memory write buffer (MemTable)
//! - Immutable sorted tables persisted as JSON arrays (`sst-N.json`)
//! - An append-only manifest ordering those tables for recovery
//! - A small HTTP front end (`GET /{key}`, `POST /{key}`)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │                 (one blocking task / request)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  MemTable   │  flush   │  Manifest   │
//!   │  (RwLock)   │ ───────▶ │  (append)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  SSTables   │
//!                           │ (sst-N.json)│
//!                           └─────────────┘
//! ```
//!
//! Not provided: compaction, tombstones, range scans, a write-ahead log.
//! Writes still in the MemTable are lost if the process dies without
//! [`Engine::close`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod memtable;
pub mod storage;
pub mod http;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of lsmkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
