//! Database Contract
//!
//! The sorted key-value interface shared by every store in the crate.
//!
//! ## Responsibilities
//! - Point reads and writes (`KeyValueReader`, `KeyValueWriter`)
//! - Atomic batches (`Batch`)
//! - Ascending iteration bounded by an inclusive start key and a key prefix (`DbIterator`)
//! - Maintenance passthroughs (`stat`, `compact`) and lifecycle (`close`)
//!
//! Both the in-memory store ([`MemDb`](crate::memdb::MemDb)) and the overlay
//! ([`VersionDb`](crate::versiondb::VersionDb)) implement [`Database`], so an
//! overlay can sit on top of either one, including another overlay.

use bytes::Bytes;

use crate::error::{KvError, Result};

/// Read side of a key-value store
pub trait KeyValueReader {
    /// Whether the key currently has a value
    fn has(&self, key: &[u8]) -> Result<bool>;

    /// The value for `key`, or `KvError::NotFound`
    ///
    /// The returned buffer is immutable; holding it never exposes the store's
    /// internal state to mutation.
    fn get(&self, key: &[u8]) -> Result<Bytes>;
}

/// Write side of a key-value store
///
/// Takes `&self`: stores are shared across threads and lock internally.
pub trait KeyValueWriter {
    /// Insert or overwrite the value for `key`
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove `key`
    fn delete(&self, key: &[u8]) -> Result<()>;
}

/// An ordered list of writes applied to a store as one unit
pub trait Batch {
    /// Record a put
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Record a delete
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Sum of recorded value lengths, plus one per delete
    fn value_size(&self) -> usize;

    /// Apply every recorded write to the store the batch was created from
    fn write(&mut self) -> Result<()>;

    /// Drop every recorded write; the batch stays usable
    fn reset(&mut self);

    /// Apply every recorded write, in order, to an arbitrary writer
    fn replay(&self, writer: &dyn KeyValueWriter) -> Result<()>;
}

/// Cursor over a store's entries in ascending key order
///
/// Starts positioned before the first entry; call [`next`](DbIterator::next)
/// before reading [`key`](DbIterator::key) or [`value`](DbIterator::value).
pub trait DbIterator: Send {
    /// Move to the next entry. Returns false once exhausted.
    fn next(&mut self) -> bool;

    /// Key of the current entry (empty before the first `next` or after exhaustion)
    fn key(&self) -> &[u8];

    /// Value of the current entry (empty before the first `next` or after exhaustion)
    fn value(&self) -> &[u8];

    /// Error that stopped iteration early, if any
    fn error(&self) -> Option<&KvError>;

    /// Release held resources. Safe to call more than once.
    fn release(&mut self);
}

/// A complete sorted key-value store
pub trait Database: KeyValueReader + KeyValueWriter + Send + Sync {
    /// Create a batch bound to this store
    fn new_batch(&self) -> Box<dyn Batch + '_>;

    /// Iterate over keys `>= start` that begin with `prefix`
    ///
    /// An empty `start` means "from the first key", an empty `prefix` matches
    /// every key.
    fn new_iterator_with_start_and_prefix(
        &self,
        start: &[u8],
        prefix: &[u8],
    ) -> Result<Box<dyn DbIterator>>;

    /// Iterate over every key
    fn new_iterator(&self) -> Result<Box<dyn DbIterator>> {
        self.new_iterator_with_start_and_prefix(&[], &[])
    }

    /// Iterate over keys `>= start`
    fn new_iterator_with_start(&self, start: &[u8]) -> Result<Box<dyn DbIterator>> {
        self.new_iterator_with_start_and_prefix(start, &[])
    }

    /// Iterate over keys beginning with `prefix`
    fn new_iterator_with_prefix(&self, prefix: &[u8]) -> Result<Box<dyn DbIterator>> {
        self.new_iterator_with_start_and_prefix(&[], prefix)
    }

    /// Store-specific statistic by name
    fn stat(&self, property: &str) -> Result<String>;

    /// Compact the key range `[start, limit]`
    fn compact(&self, start: &[u8], limit: &[u8]) -> Result<()>;

    /// Close the store. Later calls, including a second close, fail with `Closed`.
    fn close(&self) -> Result<()>;
}
