//! Merge Iterator
//!
//! Walks the pending snapshot and the underlying store's iterator together.
//!
//! ## Merge Rules
//! ```text
//!   pending key <  stored key   → emit pending (stored side untouched)
//!   pending key >  stored key   → emit stored, advance stored side
//!   pending key == stored key   → pending shadows: consume both, emit pending
//!   pending entry is tombstone  → consume it, emit nothing, keep looping
//! ```
//! The output is strictly ascending, every key at most once, and a tombstoned
//! key never surfaces.

use std::cmp::Ordering;
use std::collections::VecDeque;

use bytes::Bytes;

use crate::database::DbIterator;
use crate::error::KvError;
use crate::pending::PendingEntry;

/// Iterator over an overlay: staged entries merged with stored ones
pub struct MergeIterator {
    /// Underlying store's iterator, already bounded by start/prefix
    inner: Box<dyn DbIterator>,

    /// Staged entries captured at construction, ascending
    pending: VecDeque<(Bytes, PendingEntry)>,

    /// Pair exposed by key()/value()
    current: Option<(Bytes, Bytes)>,

    /// Whether `inner` has been moved onto its first entry
    initialized: bool,

    /// Whether `inner` has run out
    exhausted: bool,

    released: bool,
}

impl MergeIterator {
    /// Wrap `inner` and a sorted pending snapshot taken with the same bounds
    pub fn new(inner: Box<dyn DbIterator>, snapshot: Vec<(Bytes, PendingEntry)>) -> Self {
        Self {
            inner,
            pending: snapshot.into(),
            current: None,
            initialized: false,
            exhausted: false,
            released: false,
        }
    }

    /// Expose the stored entry under the cursor and step past it
    fn take_stored(&mut self) {
        let key = Bytes::copy_from_slice(self.inner.key());
        let value = Bytes::copy_from_slice(self.inner.value());
        self.current = Some((key, value));
        self.exhausted = !self.inner.next();
    }
}

impl DbIterator for MergeIterator {
    fn next(&mut self) -> bool {
        if self.released {
            return false;
        }
        if !self.initialized {
            self.exhausted = !self.inner.next();
            self.initialized = true;
        }

        loop {
            // Less: pending goes first. Greater: stored goes first.
            let order = match (self.pending.front(), self.exhausted) {
                (None, true) => {
                    self.current = None;
                    return false;
                }
                (None, false) => Ordering::Greater,
                (Some(_), true) => Ordering::Less,
                (Some((key, _)), false) => key[..].cmp(self.inner.key()),
            };

            match order {
                Ordering::Greater => {
                    self.take_stored();
                    return true;
                }
                Ordering::Equal => {
                    // Shadowed by the pending entry
                    self.exhausted = !self.inner.next();
                }
                Ordering::Less => {}
            }

            if let Some((key, PendingEntry::Value(value))) = self.pending.pop_front() {
                self.current = Some((key, value));
                return true;
            }
        }
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
        self.inner.error()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.pending.clear();
        self.current = None;
        self.inner.release();
    }
}

impl Drop for MergeIterator {
    fn drop(&mut self) {
        self.release();
    }
}
