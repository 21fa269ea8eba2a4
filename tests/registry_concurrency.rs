//! Registry journal concurrency and damage-tolerance tests
//!
//! The registry is an append-only JSONL journal guarded by an advisory
//! lock file. These tests exercise the properties operators rely on:
//! concurrent appenders never tear each other's lines, stale locks from
//! crashed writers do not wedge later appends, and a damaged journal
//! still yields the surviving mapping.

use std::fs;
use std::thread;
use std::time::Duration;

use atomreg::id::generate_uid;
use atomreg::registry::{EntryAction, Registry, RegistryEntry};
use tempfile::TempDir;

fn entry_for(key: &str, uid: &str, action: EntryAction) -> RegistryEntry {
    RegistryEntry::new(
        action,
        uid,
        key,
        "Detect Entry",
        "orchestrator",
        "docs/flow.md",
        "v1",
        "2026-01-01T00:00:00+00:00",
    )
}

// =============================================================================
// CONCURRENT APPENDERS
// =============================================================================

/// Test: Two writers appending in parallel produce only whole lines.
#[test]
fn test_concurrent_appends_keep_lines_whole() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.registry.jsonl");

    let mut handles = Vec::new();
    for writer in 0..2u32 {
        let path = path.clone();
        handles.push(thread::spawn(move || {
            let registry = Registry::open(&path);
            for i in 0..50u32 {
                let key = format!("cli/flow/v1/p00-entry/all/{:03}", writer * 50 + i);
                let entry = entry_for(&key, &generate_uid(), EntryAction::Insert);
                registry.append_entries(&[entry]).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 100);
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["atom_key"].is_string());
        assert!(value["atom_uid"].is_string());
    }

    let mapping = Registry::open(&path).read_current_mapping().unwrap();
    assert_eq!(mapping.len(), 100);

    // No lock is left behind once every writer has finished.
    assert!(!temp_dir.path().join("atoms.registry.jsonl.lock").exists());
}

/// Test: A batch lands as one contiguous run of lines.
#[test]
fn test_batch_append_is_contiguous() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.registry.jsonl");
    let registry = Registry::open(&path);

    let batch: Vec<RegistryEntry> = (0..5)
        .map(|i| {
            entry_for(
                &format!("cli/flow/v1/p00-entry/all/{:03}", i),
                &generate_uid(),
                EntryAction::Insert,
            )
        })
        .collect();
    let appended = registry.append_entries(&batch).unwrap();
    assert_eq!(appended, 5);

    let entries = registry.read_entries().unwrap();
    let keys: Vec<&str> = entries.iter().map(|e| e.atom_key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "cli/flow/v1/p00-entry/all/000",
            "cli/flow/v1/p00-entry/all/001",
            "cli/flow/v1/p00-entry/all/002",
            "cli/flow/v1/p00-entry/all/003",
            "cli/flow/v1/p00-entry/all/004",
        ]
    );
}

// =============================================================================
// STALE LOCKS
// =============================================================================

/// Test: An append waits out a lock held by someone else, then proceeds.
#[test]
fn test_stale_lock_released_mid_wait() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.registry.jsonl");
    let lock_path = temp_dir.path().join("atoms.registry.jsonl.lock");

    // A crashed writer left its lock behind.
    fs::write(&lock_path, "").unwrap();

    let releaser = {
        let lock_path = lock_path.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            fs::remove_file(&lock_path).unwrap();
        })
    };

    let registry = Registry::open(&path);
    let entry = entry_for(
        "cli/flow/v1/p00-entry/all/001",
        &generate_uid(),
        EntryAction::Insert,
    );
    let appended = registry.append_entries(&[entry]).unwrap();
    releaser.join().unwrap();

    assert_eq!(appended, 1);
    assert!(!lock_path.exists());
    assert_eq!(registry.read_current_mapping().unwrap().len(), 1);
}

// =============================================================================
// DAMAGE TOLERANCE
// =============================================================================

/// Test: The mapping is the file-order fold; the last entry for a key wins.
#[test]
fn test_last_entry_for_key_wins() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.registry.jsonl");
    let registry = Registry::open(&path);

    let key = "cli/flow/v1/p00-entry/all/001";
    let first_uid = generate_uid();
    let second_uid = generate_uid();
    registry
        .append_entries(&[entry_for(key, &first_uid, EntryAction::Insert)])
        .unwrap();
    registry
        .append_entries(&[entry_for(key, &second_uid, EntryAction::Upsert)])
        .unwrap();

    let mapping = registry.read_current_mapping().unwrap();
    assert_eq!(mapping.get(key), Some(&second_uid));
}

/// Test: Blank, malformed, and wrongly-typed lines are skipped on read.
#[test]
fn test_damaged_journal_lines_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("atoms.registry.jsonl");

    let good_uid = generate_uid();
    let journal = format!(
        concat!(
            "{{\"action\":\"insert\",\"atom_uid\":\"{}\",\"atom_key\":\"cli/flow/v1/p00-entry/all/001\",",
            "\"title\":\"T\",\"role\":\"task\",\"source_doc\":\"d.md\",\"version\":\"v1\",",
            "\"timestamp\":\"2026-01-01T00:00:00+00:00\"}}\n",
            "\n",
            "not json at all\n",
            "{{\"atom_key\": 3, \"atom_uid\": \"{}\"}}\n",
            "{{\"action\":\"insert\",\"atom_uid\":\"{}\",\"atom_key\":\"cli/flow/v1/p00-ent"
        ),
        good_uid,
        generate_uid(),
        generate_uid(),
    );
    fs::write(&path, journal).unwrap();

    let registry = Registry::open(&path);
    let mapping = registry.read_current_mapping().unwrap();

    assert_eq!(mapping.len(), 1);
    assert_eq!(
        mapping.get("cli/flow/v1/p00-entry/all/001"),
        Some(&good_uid)
    );
}

/// Test: A missing journal reads as empty, not as an error.
#[test]
fn test_missing_journal_reads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let registry = Registry::open(temp_dir.path().join("never-written.jsonl"));

    assert!(registry.read_current_mapping().unwrap().is_empty());
    assert!(registry.read_entries().unwrap().is_empty());
}
