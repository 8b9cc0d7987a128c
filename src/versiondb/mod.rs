//! VersionDb Module
//!
//! The write-buffering overlay that sits on top of another [`Database`].
//!
//! ## Responsibilities
//! - Stage puts and deletes in a pending buffer, visible to reads immediately
//! - Answer reads from the pending buffer first, then the underlying store
//! - Merge staged and stored entries into one sorted iteration
//! - Flush everything to the underlying store in one atomic batch on commit

mod batch;
mod iterator;

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::batch::WriteBatch;
use crate::config::Config;
use crate::database::{Batch, Database, DbIterator, KeyValueReader, KeyValueWriter};
use crate::error::{KvError, Result};
use crate::pending::{PendingBuffer, PendingEntry};

pub use batch::VersionDbBatch;
pub use iterator::MergeIterator;

/// Everything the lock protects, as one unit
enum State {
    Open {
        /// Staged writes, newest per key
        pending: PendingBuffer,

        /// Store that receives committed writes and serves unstaged reads
        db: Arc<dyn Database>,
    },
    Closed,
}

impl State {
    fn open(&self) -> Result<(&PendingBuffer, &Arc<dyn Database>)> {
        match self {
            State::Open { pending, db } => Ok((pending, db)),
            State::Closed => Err(KvError::Closed),
        }
    }

    fn open_mut(&mut self) -> Result<(&mut PendingBuffer, &mut Arc<dyn Database>)> {
        match self {
            State::Open { pending, db } => Ok((pending, db)),
            State::Closed => Err(KvError::Closed),
        }
    }
}

/// Overlay that buffers writes in memory until [`commit`](VersionDb::commit)
///
/// ## Concurrency Model
///
/// One `RwLock` guards the pending buffer and the underlying store handle
/// together, so "check closed, then act" is always atomic.
///
/// - **Shared lock**: has, get, stat, get_database, iterator construction
/// - **Exclusive lock**: put, delete, commit, compact, close, set_database,
///   batch write
///
/// Iterators copy the matching pending entries while the shared lock is held
/// and never look at the buffer again; the underlying iterator they wrap is
/// only as isolated as the underlying store makes it.
pub struct VersionDb {
    /// Overlay configuration
    config: Config,

    /// Pending buffer + underlying store, or closed
    state: RwLock<State>,
}

impl VersionDb {
    /// Create an overlay on top of `db` with the default config
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self::with_config(db, Config::default())
    }

    /// Create an overlay on top of `db`
    pub fn with_config(db: Arc<dyn Database>, config: Config) -> Self {
        let pending = PendingBuffer::with_capacity(config.pending_capacity);
        Self {
            config,
            state: RwLock::new(State::Open { pending, db }),
        }
    }

    /// Write every staged entry to the underlying store in one atomic batch
    ///
    /// The pending buffer is cleared only once the batch write succeeds. On
    /// failure nothing staged is lost and the call can be retried.
    pub fn commit(&self) -> Result<()> {
        let mut state = self.state.write();
        let (pending, db) = state.open_mut()?;

        if pending.is_empty() {
            return Ok(());
        }

        let mut batch = db.new_batch();
        for (key, entry) in pending.iter() {
            match entry {
                PendingEntry::Value(value) => batch.put(key, value)?,
                PendingEntry::Tombstone => batch.delete(key)?,
            }
        }
        batch.write()?;
        drop(batch);

        let committed = pending.len();
        pending.clear();
        tracing::debug!(entries = committed, "committed pending writes");
        Ok(())
    }

    /// Rebind the overlay to a different underlying store, keeping staged writes
    pub fn set_database(&self, new_db: Arc<dyn Database>) -> Result<()> {
        let mut state = self.state.write();
        let (pending, db) = state.open_mut()?;
        *db = new_db;
        tracing::debug!(pending = pending.len(), "underlying database replaced");
        Ok(())
    }

    /// The current underlying store
    pub fn get_database(&self) -> Result<Arc<dyn Database>> {
        let state = self.state.read();
        let (_, db) = state.open()?;
        Ok(Arc::clone(db))
    }

    /// Number of staged keys, tombstones included
    pub fn pending_len(&self) -> Result<usize> {
        let state = self.state.read();
        let (pending, _) = state.open()?;
        Ok(pending.len())
    }

    /// Approximate size of the staged writes in bytes
    pub fn pending_size(&self) -> Result<usize> {
        let state = self.state.read();
        let (pending, _) = state.open()?;
        Ok(pending.size())
    }

    /// Whether anything is waiting to be committed
    pub fn is_dirty(&self) -> Result<bool> {
        Ok(self.pending_len()? > 0)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stage every record of `writes`, in order, under one exclusive lock
    fn apply(&self, writes: &WriteBatch) -> Result<()> {
        let mut state = self.state.write();
        let (pending, _) = state.open_mut()?;

        for (key, entry) in writes.iter() {
            pending.insert(key.clone(), entry.clone());
        }
        tracing::trace!(records = writes.len(), "batch staged");
        Ok(())
    }
}

impl KeyValueReader for VersionDb {
    fn has(&self, key: &[u8]) -> Result<bool> {
        let state = self.state.read();
        let (pending, db) = state.open()?;

        match pending.get(key) {
            Some(entry) => Ok(!entry.is_tombstone()),
            None => db.has(key),
        }
    }

    fn get(&self, key: &[u8]) -> Result<Bytes> {
        let state = self.state.read();
        let (pending, db) = state.open()?;

        match pending.get(key) {
            Some(PendingEntry::Value(value)) => Ok(value.clone()),
            Some(PendingEntry::Tombstone) => Err(KvError::NotFound),
            None => db.get(key),
        }
    }
}

impl KeyValueWriter for VersionDb {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut state = self.state.write();
        let (pending, _) = state.open_mut()?;
        pending.put(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut state = self.state.write();
        let (pending, _) = state.open_mut()?;
        pending.delete(Bytes::copy_from_slice(key));
        Ok(())
    }
}

impl Database for VersionDb {
    fn new_batch(&self) -> Box<dyn Batch + '_> {
        Box::new(VersionDbBatch::new(self))
    }

    fn new_iterator_with_start_and_prefix(
        &self,
        start: &[u8],
        prefix: &[u8],
    ) -> Result<Box<dyn DbIterator>> {
        let state = self.state.read();
        let (pending, db) = state.open()?;

        let snapshot = pending.snapshot(start, prefix);
        let inner = db.new_iterator_with_start_and_prefix(start, prefix)?;
        Ok(Box::new(MergeIterator::new(inner, snapshot)))
    }

    fn stat(&self, property: &str) -> Result<String> {
        let state = self.state.read();
        let (_, db) = state.open()?;
        db.stat(property)
    }

    fn compact(&self, start: &[u8], limit: &[u8]) -> Result<()> {
        let state = self.state.write();
        let (_, db) = state.open()?;
        db.compact(start, limit)
    }

    /// Drop staged writes and detach from the underlying store
    ///
    /// The underlying store itself is left open.
    fn close(&self) -> Result<()> {
        let mut state = self.state.write();
        let (pending, _) = state.open()?;
        let discarded = pending.len();
        *state = State::Closed;
        tracing::debug!(discarded, "version db closed");
        Ok(())
    }
}
