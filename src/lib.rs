//! # versionkv
//!
//! A write-buffering overlay for sorted key-value stores:
//! - Writes are staged in memory and visible to reads immediately
//! - Deletes are tombstones that mask the underlying store until commit
//! - Iteration merges staged and stored entries into one sorted stream
//! - Commit applies everything to the underlying store in one atomic batch
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Callers                              │
//! │              (point ops, batches, iterators)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       VersionDb                              │
//! │            (one RwLock: pending + store handle)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │   Pending   │          │ MergeIterator │
//!   │   Buffer    │─────────▶│  (snapshot +  │
//!   └──────┬──────┘          │ store cursor) │
//!          │ commit          └───────┬───────┘
//!          ▼                         │
//!   ┌─────────────────────────────────▼───────┐
//!   │      Underlying Database (e.g. MemDb)    │
//!   └──────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod database;
pub mod batch;
pub mod pending;
pub mod memdb;
pub mod versiondb;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use database::{Batch, Database, DbIterator, KeyValueReader, KeyValueWriter};
pub use memdb::MemDb;
pub use versiondb::VersionDb;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of versionkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
