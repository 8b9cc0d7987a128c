//! Write Batch
//!
//! The ordered record log behind every [`Batch`](crate::database::Batch) in the crate.
//!
//! A `WriteBatch` only records; it never touches a store. Each store wraps one
//! and decides what "write" means (apply to a pending buffer, apply to a sorted
//! map under one lock, ...).

use bytes::Bytes;

use crate::database::KeyValueWriter;
use crate::error::Result;
use crate::pending::PendingEntry;

/// Ordered `(key, value-or-tombstone)` records plus a running size counter
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    records: Vec<(Bytes, PendingEntry)>,

    /// Value bytes recorded, plus one per delete
    size: usize,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a put. Key and value are copied.
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.records.push((
            Bytes::copy_from_slice(key),
            PendingEntry::Value(Bytes::copy_from_slice(value)),
        ));
        self.size += value.len();
    }

    /// Record a delete. The key is copied.
    pub fn delete(&mut self, key: &[u8]) {
        self.records
            .push((Bytes::copy_from_slice(key), PendingEntry::Tombstone));
        self.size += 1;
    }

    pub fn value_size(&self) -> usize {
        self.size
    }

    /// Number of recorded writes (repeated keys counted each time)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &(Bytes, PendingEntry)> {
        self.records.iter()
    }

    /// Forget every record, keeping the allocation
    pub fn reset(&mut self) {
        self.records.clear();
        self.size = 0;
    }

    /// Apply every record, in order, to `writer`
    ///
    /// Stops at the first error; records before it have already been applied.
    pub fn replay(&self, writer: &dyn KeyValueWriter) -> Result<()> {
        for (key, entry) in &self.records {
            match entry {
                PendingEntry::Value(value) => writer.put(key, value)?,
                PendingEntry::Tombstone => writer.delete(key)?,
            }
        }
        Ok(())
    }
}
