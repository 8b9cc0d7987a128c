//! Pending buffer implementation
//!
//! HashMap-based staging map. Not synchronized: the overlay wraps it in its lock.

use std::collections::HashMap;

use bytes::Bytes;

use super::PendingEntry;

/// Staged mutations, one per key
#[derive(Debug, Default)]
pub struct PendingBuffer {
    entries: HashMap<Bytes, PendingEntry>,

    /// Approximate size in bytes: key lengths plus value lengths
    size: usize,

    /// Capacity restored by `clear`
    capacity: usize,
}

impl PendingBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty buffer with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            size: 0,
            capacity,
        }
    }

    /// Get the staged entry for a key
    pub fn get(&self, key: &[u8]) -> Option<&PendingEntry> {
        self.entries.get(key)
    }

    /// Stage a value, replacing whatever was staged for the key
    pub fn put(&mut self, key: Bytes, value: Bytes) {
        self.insert(key, PendingEntry::Value(value))
    }

    /// Stage a tombstone, replacing whatever was staged for the key
    pub fn delete(&mut self, key: Bytes) {
        self.insert(key, PendingEntry::Tombstone)
    }

    /// Stage an entry, replacing whatever was staged for the key
    pub fn insert(&mut self, key: Bytes, entry: PendingEntry) {
        let added = entry.value_len();
        match self.entries.insert(key.clone(), entry) {
            Some(old) => {
                self.size = self.size - old.value_len() + added;
            }
            None => {
                self.size += key.len() + added;
            }
        }
    }

    /// Number of staged keys (tombstones included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate size in bytes (tombstones count their key only)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterate over staged entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &PendingEntry)> {
        self.entries.iter()
    }

    /// Sorted copy of the entries with key `>= start` and key starting with `prefix`
    ///
    /// Empty `start` and `prefix` select everything. The result is detached from
    /// the buffer: later writes never show up in it.
    pub fn snapshot(&self, start: &[u8], prefix: &[u8]) -> Vec<(Bytes, PendingEntry)> {
        let mut selected: Vec<(Bytes, PendingEntry)> = self
            .entries
            .iter()
            .filter(|(key, _)| {
                let key: &[u8] = key;
                key.starts_with(prefix) && key >= start
            })
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        selected.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        selected
    }

    /// Drop every staged entry and shrink back to the configured capacity
    pub fn clear(&mut self) {
        self.entries = HashMap::with_capacity(self.capacity);
        self.size = 0;
    }
}
