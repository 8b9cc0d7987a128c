//! MemDb Iterator
//!
//! Sequential iteration over a copied range of a MemDb.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::database::DbIterator;
use crate::error::KvError;

/// Iterator over MemDb entries in sorted key order
///
/// Owns a copy of the selected entries, so it holds no lock and never sees
/// writes made after it was created.
pub struct MemDbIterator {
    /// Entries not yet visited, ascending
    remaining: VecDeque<(Bytes, Bytes)>,

    /// Entry the iterator is positioned on
    current: Option<(Bytes, Bytes)>,
}

impl MemDbIterator {
    /// Create an iterator positioned before `entries[0]`
    ///
    /// `entries` must already be in ascending key order.
    pub(super) fn new(entries: Vec<(Bytes, Bytes)>) -> Self {
        Self {
            remaining: entries.into(),
            current: None,
        }
    }
}

impl DbIterator for MemDbIterator {
    fn next(&mut self) -> bool {
        self.current = self.remaining.pop_front();
        self.current.is_some()
    }

    fn key(&self) -> &[u8] {
        match &self.current {
            Some((key, _)) => &key[..],
            None => &[],
        }
    }

    fn value(&self) -> &[u8] {
        match &self.current {
            Some((_, value)) => &value[..],
            None => &[],
        }
    }

    fn error(&self) -> Option<&KvError> {
        None
    }

    fn release(&mut self) {
        self.remaining.clear();
        self.current = None;
    }
}
