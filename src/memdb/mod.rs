//! MemDb Module
//!
//! In-memory sorted key-value store implementing the full [`Database`] contract.
//!
//! ## Responsibilities
//! - Sorted storage with point reads, writes and bounded iteration
//! - All-or-nothing batch writes (one write lock per batch)
//! - Explicit open/closed lifecycle
//!
//! Used as the backing store under a [`VersionDb`](crate::versiondb::VersionDb)
//! in tests, benchmarks and the shell.

mod iterator;

use std::collections::BTreeMap;
use std::ops::Bound;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::batch::WriteBatch;
use crate::database::{Batch, Database, DbIterator, KeyValueReader, KeyValueWriter};
use crate::error::{KvError, Result};
use crate::pending::PendingEntry;

pub use iterator::MemDbIterator;

/// Stat property: number of keys stored
pub const STAT_KEYS: &str = "memdb.keys";

/// Stat property: total key + value bytes stored
pub const STAT_SIZE: &str = "memdb.size";

/// In-memory sorted store
///
/// ## Concurrency:
/// - `state`: one RwLock guards both the map and the open/closed flag
/// - Readers and iterator construction share the lock, writers take it exclusively
pub struct MemDb {
    state: RwLock<Option<BTreeMap<Bytes, Bytes>>>,
}

impl MemDb {
    /// Create an empty, open store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Some(BTreeMap::new())),
        }
    }

    /// Number of keys stored
    pub fn len(&self) -> Result<usize> {
        let state = self.state.read();
        let map = state.as_ref().ok_or(KvError::Closed)?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Apply a whole batch under a single write lock
    fn apply(&self, batch: &WriteBatch) -> Result<()> {
        let mut state = self.state.write();
        let map = state.as_mut().ok_or(KvError::Closed)?;

        for (key, entry) in batch.iter() {
            match entry {
                PendingEntry::Value(value) => {
                    map.insert(key.clone(), value.clone());
                }
                PendingEntry::Tombstone => {
                    map.remove(key);
                }
            }
        }
        Ok(())
    }
}

impl Default for MemDb {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueReader for MemDb {
    fn has(&self, key: &[u8]) -> Result<bool> {
        let state = self.state.read();
        let map = state.as_ref().ok_or(KvError::Closed)?;
        Ok(map.contains_key(key))
    }

    fn get(&self, key: &[u8]) -> Result<Bytes> {
        let state = self.state.read();
        let map = state.as_ref().ok_or(KvError::Closed)?;
        map.get(key).cloned().ok_or(KvError::NotFound)
    }
}

impl KeyValueWriter for MemDb {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut state = self.state.write();
        let map = state.as_mut().ok_or(KvError::Closed)?;
        map.insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut state = self.state.write();
        let map = state.as_mut().ok_or(KvError::Closed)?;
        map.remove(key);
        Ok(())
    }
}

impl Database for MemDb {
    fn new_batch(&self) -> Box<dyn Batch + '_> {
        Box::new(MemDbBatch {
            db: self,
            writes: WriteBatch::new(),
        })
    }

    fn new_iterator_with_start_and_prefix(
        &self,
        start: &[u8],
        prefix: &[u8],
    ) -> Result<Box<dyn DbIterator>> {
        let state = self.state.read();
        let map = state.as_ref().ok_or(KvError::Closed)?;

        // Keys sharing a prefix are contiguous, and none sorts below the prefix
        let lower = if start > prefix { start } else { prefix };
        let entries = map
            .range::<[u8], _>((Bound::Included(lower), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Box::new(MemDbIterator::new(entries)))
    }

    fn stat(&self, property: &str) -> Result<String> {
        let state = self.state.read();
        let map = state.as_ref().ok_or(KvError::Closed)?;

        match property {
            STAT_KEYS => Ok(map.len().to_string()),
            STAT_SIZE => {
                let size: usize = map.iter().map(|(k, v)| k.len() + v.len()).sum();
                Ok(size.to_string())
            }
            _ => Err(KvError::NotFound),
        }
    }

    fn compact(&self, _start: &[u8], _limit: &[u8]) -> Result<()> {
        // Nothing to reclaim in a BTreeMap
        let state = self.state.read();
        state.as_ref().ok_or(KvError::Closed)?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.write();
        state.take().ok_or(KvError::Closed)?;
        tracing::debug!("memdb closed");
        Ok(())
    }
}

/// Batch bound to a [`MemDb`]; `write` applies it atomically
pub struct MemDbBatch<'a> {
    db: &'a MemDb,
    writes: WriteBatch,
}

impl Batch for MemDbBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.writes.put(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.writes.delete(key);
        Ok(())
    }

    fn value_size(&self) -> usize {
        self.writes.value_size()
    }

    fn write(&mut self) -> Result<()> {
        self.db.apply(&self.writes)
    }

    fn reset(&mut self) {
        self.writes.reset();
    }

    fn replay(&self, writer: &dyn KeyValueWriter) -> Result<()> {
        self.writes.replay(writer)
    }
}
