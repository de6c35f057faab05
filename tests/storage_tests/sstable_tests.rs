//! Tests for SSTable implementation
//!
//! These tests verify:
//! - SSTable creation and on-disk JSON layout
//! - Linear key lookups
//! - Sorted-order enforcement in the builder
//! - Missing/corrupt tables read as "not found"
//! - File naming helpers

use std::fs;
use std::path::{Path, PathBuf};

use lsmkv::storage::{
    parse_sequence, scan, sstable_file_name, write_sstable, KvPair, SSTable, SSTableBuilder,
    SSTableReader,
};
use lsmkv::KvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_sstable() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sst-1.json");
    (temp_dir, path)
}

/// Create an SSTable with numbered entries
fn create_sstable_with_entries(path: &Path, count: usize) -> SSTable {
    let mut builder = SSTableBuilder::new(path);
    // Keys must be added in sorted order
    for i in 0..count {
        let key = format!("key{:05}", i); // Zero-padded for lexicographic order
        let value = format!("value{}", i);
        builder.add(&key, &value).unwrap();
    }
    builder.finish().unwrap()
}

// =============================================================================
// SSTableBuilder Tests
// =============================================================================

#[test]
fn test_builder_creates_file() {
    let (_temp, path) = setup_temp_sstable();

    let sstable = create_sstable_with_entries(&path, 5);

    assert!(path.exists());
    assert_eq!(sstable.entry_count, 5);
    assert_eq!(sstable.path, path);
    assert_eq!(sstable.file_size, fs::metadata(&path).unwrap().len());
}

#[test]
fn test_builder_writes_json_array() {
    let (_temp, path) = setup_temp_sstable();

    let mut builder = SSTableBuilder::new(&path);
    builder.add("a", "1").unwrap();
    builder.add("b", "2").unwrap();
    builder.finish().unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        r#"[{"key":"a","value":"1"},{"key":"b","value":"2"}]"#
    );
}

#[test]
fn test_builder_empty_sstable() {
    let (_temp, path) = setup_temp_sstable();

    let sstable = SSTableBuilder::new(&path).finish().unwrap();

    assert_eq!(sstable.entry_count, 0);
    assert_eq!(sstable.file_size, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn test_builder_rejects_unsorted_keys() {
    let (_temp, path) = setup_temp_sstable();

    let mut builder = SSTableBuilder::new(&path);
    builder.add("b", "2").unwrap();

    let result = builder.add("a", "1");
    assert!(matches!(result, Err(KvError::Storage(_))));
}

#[test]
fn test_builder_rejects_duplicate_keys() {
    let (_temp, path) = setup_temp_sstable();

    let mut builder = SSTableBuilder::new(&path);
    builder.add("a", "1").unwrap();

    assert!(builder.add("a", "2").is_err());
    assert_eq!(builder.entry_count(), 1);
}

#[test]
fn test_builder_overwrites_existing_file() {
    let (_temp, path) = setup_temp_sstable();
    fs::write(&path, "stale contents that are much longer than the new table").unwrap();

    write_sstable(&[KvPair::new("k", "v")], &path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"[{"key":"k","value":"v"}]"#
    );
}

#[test]
fn test_failed_write_leaves_no_temp_file() {
    let (temp, path) = setup_temp_sstable();
    fs::create_dir(&path).unwrap();

    assert!(write_sstable(&[KvPair::new("k", "v")], &path).is_err());

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|n| n.to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

// =============================================================================
// SSTableReader Tests
// =============================================================================

#[test]
fn test_reader_get_existing_keys() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 100);

    let reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.entry_count(), 100);
    assert_eq!(reader.get("key00000"), Some("value0"));
    assert_eq!(reader.get("key00042"), Some("value42"));
    assert_eq!(reader.get("key00099"), Some("value99"));
    assert_eq!(reader.get("key00100"), None);
    assert_eq!(reader.min_key(), Some("key00000"));
    assert_eq!(reader.max_key(), Some("key00099"));
}

#[test]
fn test_reader_open_missing_file() {
    let (_temp, path) = setup_temp_sstable();

    let result = SSTableReader::open(&path);
    assert!(matches!(result, Err(KvError::Io(_))));
}

#[test]
fn test_reader_open_corrupt_file() {
    let (_temp, path) = setup_temp_sstable();
    fs::write(&path, "{not json").unwrap();

    let result = SSTableReader::open(&path);
    assert!(matches!(result, Err(KvError::Serialization(_))));
}

#[test]
fn test_reader_accepts_escaped_values() {
    let (_temp, path) = setup_temp_sstable();
    // HTML-escaped form as emitted by other JSON encoders
    fs::write(&path, r#"[{"key":"k","value":"\u003ctag\u003e \u0026 ok"}]"#).unwrap();

    let reader = SSTableReader::open(&path).unwrap();
    assert_eq!(reader.get("k"), Some("<tag> & ok"));
}

// =============================================================================
// Scan Tests
// =============================================================================

#[test]
fn test_scan_finds_key() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 20);

    assert_eq!(scan(&path, "key00007"), Some("value7".to_string()));
    assert_eq!(scan(&path, "nope"), None);
}

#[test]
fn test_scan_missing_file_is_not_found() {
    let (_temp, path) = setup_temp_sstable();

    assert_eq!(scan(&path, "key"), None);
}

#[test]
fn test_scan_corrupt_file_is_not_found() {
    let (_temp, path) = setup_temp_sstable();
    fs::write(&path, r#"[{"key":"a","value":"1"},"#).unwrap();

    // indistinguishable from absence
    assert_eq!(scan(&path, "a"), None);
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_file_name_round_trip() {
    assert_eq!(sstable_file_name(1), "sst-1.json");
    assert_eq!(sstable_file_name(123), "sst-123.json");
    assert_eq!(parse_sequence("sst-42.json"), Some(42));
}

#[test]
fn test_parse_sequence_rejects_other_names() {
    assert_eq!(parse_sequence("sst-.json"), None);
    assert_eq!(parse_sequence("sst-1.sst"), None);
    assert_eq!(parse_sequence("sstable_000001.sst"), None);
    assert_eq!(parse_sequence("MANIFEST"), None);
}
