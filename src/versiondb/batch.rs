//! VersionDb Batch
//!
//! Records writes independently of the overlay and stages them all at once.

use crate::batch::WriteBatch;
use crate::database::{Batch, KeyValueWriter};
use crate::error::Result;

use super::VersionDb;

/// Batch bound to a [`VersionDb`]
///
/// Nothing reaches the overlay until [`write`](Batch::write); then every record
/// is staged in the order it was added, so the last write to a key wins.
pub struct VersionDbBatch<'a> {
    db: &'a VersionDb,
    writes: WriteBatch,
}

impl<'a> VersionDbBatch<'a> {
    pub(super) fn new(db: &'a VersionDb) -> Self {
        Self {
            db,
            writes: WriteBatch::new(),
        }
    }
}

impl Batch for VersionDbBatch<'_> {
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

    /// Stage the recorded writes in the overlay (fails with `Closed` once it is closed)
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
