//! Error types for versionkv
//!
//! Provides a unified error type for the overlay and every store behind it.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for versionkv operations
///
/// Errors raised by an underlying store travel through the overlay untouched,
/// so a caller sees exactly the variant the store produced.
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    /// The store (or a batch bound to it) has been closed. Permanent.
    #[error("database closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// The key has no value: never written, deleted, or masked by a tombstone.
    #[error("not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Underlying Store Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl KvError {
    /// True for the `NotFound` variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::NotFound)
    }

    /// True for the `Closed` variant
    pub fn is_closed(&self) -> bool {
        matches!(self, KvError::Closed)
    }
}
