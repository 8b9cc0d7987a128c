//! Pending Module
//!
//! In-memory staging area for writes that have not been committed yet.
//!
//! ## Responsibilities
//! - Hold the latest staged mutation per key (last write wins)
//! - Keep tombstones until commit so they mask the underlying store
//! - Track approximate size for callers that want to commit early
//! - Produce sorted, bounded snapshots for iteration
//!
//! ## Data Structure Choice
//! A `HashMap` keyed by `Bytes`:
//! - Point reads and writes dominate, ordering is only needed for iteration
//! - Iteration sorts the matching subset once, at construction time
//! - The owning overlay provides all locking

mod buffer;

use bytes::Bytes;

pub use buffer::PendingBuffer;

/// A staged mutation for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEntry {
    /// A replacement value
    Value(Bytes),

    /// A tombstone (deleted key)
    Tombstone,
}

impl PendingEntry {
    /// Whether this entry marks the key as deleted
    pub fn is_tombstone(&self) -> bool {
        matches!(self, PendingEntry::Tombstone)
    }

    /// The staged value, or `None` for a tombstone
    pub fn value(&self) -> Option<&Bytes> {
        match self {
            PendingEntry::Value(value) => Some(value),
            PendingEntry::Tombstone => None,
        }
    }

    /// Bytes this entry contributes to a buffer's size, excluding the key
    pub(crate) fn value_len(&self) -> usize {
        match self {
            PendingEntry::Value(value) => value.len(),
            PendingEntry::Tombstone => 0,
        }
    }
}
