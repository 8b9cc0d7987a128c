//! PendingBuffer Tests
//!
//! Tests verify:
//! - Last-write-wins staging
//! - Tombstone retention
//! - Size tracking
//! - Sorted, bounded snapshots
//! - Clear functionality

use bytes::Bytes;
use versionkv::pending::{PendingBuffer, PendingEntry};

fn b(s: &str) -> Bytes {
    Bytes::copy_from_slice(s.as_bytes())
}

fn keys(snapshot: &[(Bytes, PendingEntry)]) -> Vec<String> {
    snapshot
        .iter()
        .map(|(k, _)| String::from_utf8_lossy(k).into_owned())
        .collect()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_buffer_is_empty() {
    let buffer = PendingBuffer::new();
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.size(), 0);
    assert!(buffer.is_empty());
}

#[test]
fn test_put_and_get() {
    let mut buffer = PendingBuffer::new();

    buffer.put(b("key1"), b("value1"));

    assert_eq!(buffer.get(b"key1"), Some(&PendingEntry::Value(b("value1"))));
    assert_eq!(buffer.get(b"missing"), None);
}

#[test]
fn test_put_overwrites_existing() {
    let mut buffer = PendingBuffer::new();

    buffer.put(b("key1"), b("value1"));
    buffer.put(b("key1"), b("value2"));

    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.get(b"key1"), Some(&PendingEntry::Value(b("value2"))));
}

// =============================================================================
// Delete / Tombstone Tests
// =============================================================================

#[test]
fn test_delete_keeps_tombstone() {
    let mut buffer = PendingBuffer::new();

    buffer.put(b("key1"), b("value1"));
    buffer.delete(b("key1"));

    let entry = buffer.get(b"key1").unwrap();
    assert!(entry.is_tombstone());
    assert_eq!(entry.value(), None);
    assert_eq!(buffer.len(), 1); // Tombstone still counts as entry
}

#[test]
fn test_delete_unstaged_key() {
    let mut buffer = PendingBuffer::new();

    buffer.delete(b("ghost"));

    assert_eq!(buffer.get(b"ghost"), Some(&PendingEntry::Tombstone));
    assert_eq!(buffer.len(), 1);
}

#[test]
fn test_put_after_delete() {
    let mut buffer = PendingBuffer::new();

    buffer.delete(b("key1"));
    buffer.put(b("key1"), b("again"));

    assert_eq!(buffer.get(b"key1"), Some(&PendingEntry::Value(b("again"))));
}

// =============================================================================
// Size Tracking Tests
// =============================================================================

#[test]
fn test_size_tracking() {
    let mut buffer = PendingBuffer::new();

    buffer.put(b("key"), b("short"));
    assert_eq!(buffer.size(), 3 + 5);

    buffer.put(b("key"), b("much_longer_value"));
    assert_eq!(buffer.size(), 3 + 17);

    buffer.delete(b("key"));
    assert_eq!(buffer.size(), 3); // Tombstone = just key

    buffer.insert(b("key"), PendingEntry::Value(b("abc")));
    assert_eq!(buffer.size(), 3 + 3);

    buffer.put(b("other"), b("v"));
    assert_eq!(buffer.size(), 3 + 5 + 1);
}

// =============================================================================
// Snapshot Tests
// =============================================================================

#[test]
fn test_snapshot_sorted_and_includes_tombstones() {
    let mut buffer = PendingBuffer::new();

    buffer.put(b("cherry"), b("3"));
    buffer.delete(b("apple"));
    buffer.put(b("banana"), b("2"));

    let snapshot = buffer.snapshot(b"", b"");

    assert_eq!(keys(&snapshot), vec!["apple", "banana", "cherry"]);
    assert!(snapshot[0].1.is_tombstone());
}

#[test]
fn test_snapshot_start_is_inclusive() {
    let mut buffer = PendingBuffer::new();
    for k in ["a", "b", "c", "d"] {
        buffer.put(b(k), b("v"));
    }

    let snapshot = buffer.snapshot(b"b", b"");

    assert_eq!(keys(&snapshot), vec!["b", "c", "d"]);
}

#[test]
fn test_snapshot_prefix_filter() {
    let mut buffer = PendingBuffer::new();
    for k in ["user:1", "user:2", "item:1", "user", "users"] {
        buffer.put(b(k), b("v"));
    }

    let snapshot = buffer.snapshot(b"", b"user:");

    assert_eq!(keys(&snapshot), vec!["user:1", "user:2"]);
}

#[test]
fn test_snapshot_start_and_prefix() {
    let mut buffer = PendingBuffer::new();
    for k in ["p1", "p2", "p3", "q1"] {
        buffer.put(b(k), b("v"));
    }

    // Start below the prefix range selects the whole prefix
    assert_eq!(keys(&buffer.snapshot(b"a", b"p")), vec!["p1", "p2", "p3"]);
    // Start inside the prefix range trims it
    assert_eq!(keys(&buffer.snapshot(b"p2", b"p")), vec!["p2", "p3"]);
    // Start past the prefix range selects nothing
    assert!(buffer.snapshot(b"q", b"p").is_empty());
}

#[test]
fn test_snapshot_is_detached() {
    let mut buffer = PendingBuffer::new();

    buffer.put(b("key"), b("value"));
    let snapshot = buffer.snapshot(b"", b"");

    buffer.put(b("key"), b("modified"));
    buffer.put(b("new"), b("x"));

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].1, PendingEntry::Value(b("value")));
}

// =============================================================================
// Clear Tests
// =============================================================================

#[test]
fn test_clear() {
    let mut buffer = PendingBuffer::with_capacity(16);

    buffer.put(b("key1"), b("value1"));
    buffer.delete(b("key2"));
    assert_eq!(buffer.len(), 2);

    buffer.clear();

    assert!(buffer.is_empty());
    assert_eq!(buffer.size(), 0);
    assert_eq!(buffer.get(b"key1"), None);
    assert_eq!(buffer.get(b"key2"), None);
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_empty_key_and_value() {
    let mut buffer = PendingBuffer::new();

    buffer.put(Bytes::new(), Bytes::new());

    assert_eq!(buffer.get(&[]), Some(&PendingEntry::Value(Bytes::new())));
    assert_eq!(keys(&buffer.snapshot(b"", b"")), vec![""]);
}

#[test]
fn test_many_entries_sorted() {
    let mut buffer = PendingBuffer::new();

    for i in (0..1000).rev() {
        buffer.put(b(&format!("key{:04}", i)), b(&format!("value{}", i)));
    }

    let snapshot = buffer.snapshot(b"", b"");
    assert_eq!(snapshot.len(), 1000);
    for pair in snapshot.windows(2) {
        assert!(pair[0].0 < pair[1].0);
    }
}
