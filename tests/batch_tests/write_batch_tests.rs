//! WriteBatch Tests
//!
//! Tests verify:
//! - Records keep insertion order, duplicates included
//! - Size counter (value bytes, one per delete)
//! - Reset
//! - Replay onto an arbitrary writer

use std::sync::Mutex;

use versionkv::batch::WriteBatch;
use versionkv::pending::PendingEntry;
use versionkv::{KeyValueReader, KeyValueWriter, KvError, MemDb, Result};

/// Writer that records the calls it receives
#[derive(Default)]
struct RecordingWriter {
    calls: Mutex<Vec<String>>,
}

impl KeyValueWriter for RecordingWriter {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.calls.lock().unwrap().push(format!(
            "put {} {}",
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value)
        ));
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("del {}", String::from_utf8_lossy(key)));
        Ok(())
    }
}

/// Writer that rejects every delete
struct NoDeletes;

impl KeyValueWriter for NoDeletes {
    fn put(&self, _key: &[u8], _value: &[u8]) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _key: &[u8]) -> Result<()> {
        Err(KvError::Storage("deletes not allowed".to_string()))
    }
}

// =============================================================================
// Recording Tests
// =============================================================================

#[test]
fn test_new_batch_is_empty() {
    let batch = WriteBatch::new();
    assert!(batch.is_empty());
    assert_eq!(batch.len(), 0);
    assert_eq!(batch.value_size(), 0);
}

#[test]
fn test_records_keep_order_and_duplicates() {
    let mut batch = WriteBatch::new();

    batch.put(b"a", b"1");
    batch.delete(b"b");
    batch.put(b"a", b"2");

    let records: Vec<_> = batch.iter().collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].0, &b"a"[..]);
    assert_eq!(records[0].1, PendingEntry::Value("1".into()));
    assert_eq!(records[1].1, PendingEntry::Tombstone);
    assert_eq!(records[2].1, PendingEntry::Value("2".into()));
}

#[test]
fn test_value_size_counts_values_and_deletes() {
    let mut batch = WriteBatch::new();

    batch.put(b"key", b"hello");
    assert_eq!(batch.value_size(), 5);

    batch.delete(b"key");
    assert_eq!(batch.value_size(), 6);

    batch.put(b"k", b"");
    assert_eq!(batch.value_size(), 6);
}

#[test]
fn test_put_copies_caller_buffers() {
    let mut batch = WriteBatch::new();
    let mut value = b"original".to_vec();

    batch.put(b"key", &value);
    value[0] = b'X';

    let (_, entry) = batch.iter().next().unwrap();
    assert_eq!(entry.value().unwrap(), &b"original"[..]);
}

#[test]
fn test_reset() {
    let mut batch = WriteBatch::new();
    batch.put(b"a", b"1");
    batch.delete(b"b");

    batch.reset();

    assert!(batch.is_empty());
    assert_eq!(batch.value_size(), 0);

    batch.put(b"c", b"33");
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.value_size(), 2);
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_in_order() {
    let mut batch = WriteBatch::new();
    batch.put(b"a", b"1");
    batch.delete(b"a");
    batch.put(b"b", b"2");

    let writer = RecordingWriter::default();
    batch.replay(&writer).unwrap();

    assert_eq!(
        *writer.calls.lock().unwrap(),
        vec!["put a 1", "del a", "put b 2"]
    );
}

#[test]
fn test_replay_onto_store() {
    let store = MemDb::new();
    store.put(b"gone", b"x").unwrap();

    let mut batch = WriteBatch::new();
    batch.put(b"kept", b"y");
    batch.delete(b"gone");

    batch.replay(&store).unwrap();

    assert_eq!(store.get(b"kept").unwrap(), &b"y"[..]);
    assert!(!store.has(b"gone").unwrap());
}

#[test]
fn test_replay_stops_at_first_error() {
    let mut batch = WriteBatch::new();
    batch.put(b"a", b"1");
    batch.delete(b"b");

    let err = batch.replay(&NoDeletes).unwrap_err();
    assert!(matches!(err, KvError::Storage(_)));
}
