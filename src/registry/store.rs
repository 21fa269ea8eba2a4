//! Append-only registry store.
//!
//! The registry is a single JSONL journal. Writers only ever append;
//! the current key-to-uid mapping is recovered by folding the journal
//! in file order with the last entry for a key winning. Unreadable
//! lines are skipped during the fold so one bad line never poisons the
//! rest of the journal.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::id;
use crate::observability::Logger;

use super::entry::RegistryEntry;
use super::errors::{RegistryError, RegistryResult};

/// Attempts made to create the lock file before proceeding unlocked.
const LOCK_RETRY_ATTEMPTS: u32 = 100;
/// Pause between lock attempts.
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Handle on a registry journal file.
///
/// Opening is cheap and performs no I/O; the file may not exist yet.
/// Every read is a full scan and every write is an appended batch, so
/// the handle itself carries no cached state.
pub struct Registry {
    registry_path: PathBuf,
}

impl Registry {
    /// Creates a handle for the registry at the given path.
    pub fn open(registry_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.into(),
        }
    }

    /// Returns the path to the registry file.
    pub fn path(&self) -> &Path {
        &self.registry_path
    }

    /// Returns the lock file path: the registry file name with `.lock`
    /// appended.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .registry_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.registry_path.with_file_name(name)
    }

    /// Folds the journal into the current key-to-uid mapping.
    ///
    /// A missing file is an empty mapping. Blank lines, lines that are
    /// not JSON, and lines lacking string `atom_key` and `atom_uid`
    /// fields are skipped. Later entries for a key replace earlier
    /// ones.
    pub fn read_current_mapping(&self) -> RegistryResult<HashMap<String, String>> {
        let file = match fs::File::open(&self.registry_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(RegistryError::read_failed(
                    format!(
                        "Failed to open registry file: {}",
                        self.registry_path.display()
                    ),
                    e,
                ))
            }
        };

        let mut mapping = HashMap::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| {
                RegistryError::read_failed(
                    format!(
                        "Failed to read registry file: {}",
                        self.registry_path.display()
                    ),
                    e,
                )
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
                continue;
            };
            let (Some(atom_key), Some(atom_uid)) = (
                value.get("atom_key").and_then(Value::as_str),
                value.get("atom_uid").and_then(Value::as_str),
            ) else {
                continue;
            };
            mapping.insert(atom_key.to_string(), atom_uid.to_string());
        }

        Ok(mapping)
    }

    /// Reads the full journal as typed entries, skipping lines that do
    /// not parse as complete entries.
    pub fn read_entries(&self) -> RegistryResult<Vec<RegistryEntry>> {
        let file = match fs::File::open(&self.registry_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RegistryError::read_failed(
                    format!(
                        "Failed to open registry file: {}",
                        self.registry_path.display()
                    ),
                    e,
                ))
            }
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| {
                RegistryError::read_failed(
                    format!(
                        "Failed to read registry file: {}",
                        self.registry_path.display()
                    ),
                    e,
                )
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Ok(entry) = serde_json::from_str::<RegistryEntry>(trimmed) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    /// Returns the uid for a key from the mapping snapshot, or mints a
    /// fresh one.
    ///
    /// The second element is true when the uid is newly assigned. The
    /// caller owns the snapshot and must record new assignments in it
    /// so repeated lookups within one batch stay stable.
    pub fn lookup_or_assign(mapping: &HashMap<String, String>, atom_key: &str) -> (String, bool) {
        match mapping.get(atom_key) {
            Some(uid) => (uid.clone(), false),
            None => (id::generate_uid(), true),
        }
    }

    /// Appends a batch of entries to the journal.
    ///
    /// The whole batch is serialized into one buffer and written with a
    /// single write followed by fsync, so concurrent writers interleave
    /// at batch granularity and never tear a line. Returns the number
    /// of entries appended; an empty batch touches nothing.
    pub fn append_entries(&self, entries: &[RegistryEntry]) -> RegistryResult<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        if let Some(parent) = self.registry_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    RegistryError::append_failed(
                        format!("Failed to create registry directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let mut batch = String::new();
        for entry in entries {
            let line = serde_json::to_string(entry).map_err(|e| {
                RegistryError::serialize_failed(format!(
                    "Failed to serialize registry entry for {}: {}",
                    entry.atom_key, e
                ))
            })?;
            batch.push_str(&line);
            batch.push('\n');
        }

        let _lock = LockToken::acquire(&self.lock_path());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.registry_path)
            .map_err(|e| {
                RegistryError::append_failed(
                    format!(
                        "Failed to open registry file: {}",
                        self.registry_path.display()
                    ),
                    e,
                )
            })?;

        file.write_all(batch.as_bytes()).map_err(|e| {
            RegistryError::append_failed(
                format!("Failed to append {} entries to registry", entries.len()),
                e,
            )
        })?;

        file.sync_all()
            .map_err(|e| RegistryError::sync_failed("fsync failed after registry append", e))?;

        Ok(entries.len())
    }
}

/// Advisory lock held for the duration of one append.
///
/// Acquisition creates the lock file exclusively, retrying while a
/// competing writer holds it. A writer that exhausts the retry budget
/// logs a warning and proceeds unlocked rather than failing the batch.
struct LockToken {
    path: PathBuf,
}

impl LockToken {
    fn acquire(path: &Path) -> Self {
        let token = Self {
            path: path.to_path_buf(),
        };
        for _ in 0..LOCK_RETRY_ATTEMPTS {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&token.path)
            {
                Ok(_) => return token,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    thread::sleep(LOCK_RETRY_DELAY)
                }
                // Any other failure surfaces on the append open instead.
                Err(_) => return token,
            }
        }
        Logger::warn(
            "registry.lock_timeout",
            &[("lock", &token.path.display().to_string())],
        );
        token
    }
}

impl Drop for LockToken {
    fn drop(&mut self) {
        // Removed even when acquisition timed out, so a token left by a
        // crashed writer cannot wedge every later append.
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::entry::EntryAction;
    use tempfile::TempDir;

    fn sample_entry(key: &str, uid: &str) -> RegistryEntry {
        RegistryEntry::new(
            EntryAction::Insert,
            uid,
            key,
            "Detect Entry",
            "orchestrator",
            "docs/dev-setup.md",
            "v1",
            "2026-01-01T00:00:00+00:00",
        )
    }

    #[test]
    fn test_missing_file_reads_empty_mapping() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::open(temp_dir.path().join("atoms.registry.jsonl"));

        assert!(registry.read_current_mapping().unwrap().is_empty());
        assert!(registry.read_entries().unwrap().is_empty());
    }

    #[test]
    fn test_lock_path_appends_to_file_name() {
        let registry = Registry::open("data/atoms.registry.jsonl");
        assert_eq!(
            registry.lock_path(),
            PathBuf::from("data/atoms.registry.jsonl.lock")
        );
    }

    #[test]
    fn test_mapping_last_entry_wins_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atoms.registry.jsonl");
        fs::write(
            &path,
            concat!(
                "{\"atom_key\": \"cli/wf/v1/p/all/001\", \"atom_uid\": \"01ARZ3NDEKTSV4RRFFQ69G5FAV\"}\n",
                "{\"atom_key\": \"cli/wf/v1/p/all/001\", \"atom_uid\": \"01K6W1BSSCAZGCG5M81WJHRSXK\"}\n",
            ),
        )
        .unwrap();

        let mapping = Registry::open(&path).read_current_mapping().unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping["cli/wf/v1/p/all/001"],
            "01K6W1BSSCAZGCG5M81WJHRSXK"
        );
    }

    #[test]
    fn test_mapping_skips_blank_and_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atoms.registry.jsonl");
        fs::write(
            &path,
            concat!(
                "\n",
                "not json at all\n",
                "{\"atom_key\": \"cli/wf/v1/p/all/001\", \"atom_uid\": \"01ARZ3NDEKTSV4RRFFQ69G5FAV\"}\n",
                "   \n",
                "{\"atom_key\": \"cli/wf/v1/p/all/002\"\n",
            ),
        )
        .unwrap();

        let mapping = Registry::open(&path).read_current_mapping().unwrap();
        assert_eq!(mapping.len(), 1);
        assert!(mapping.contains_key("cli/wf/v1/p/all/001"));
    }

    #[test]
    fn test_mapping_requires_both_fields_as_strings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("atoms.registry.jsonl");
        fs::write(
            &path,
            concat!(
                "{\"atom_key\": \"cli/wf/v1/p/all/001\"}\n",
                "{\"atom_uid\": \"01ARZ3NDEKTSV4RRFFQ69G5FAV\"}\n",
                "{\"atom_key\": \"cli/wf/v1/p/all/002\", \"atom_uid\": 42}\n",
                "{\"atom_key\": 7, \"atom_uid\": \"01ARZ3NDEKTSV4RRFFQ69G5FAV\"}\n",
            ),
        )
        .unwrap();

        let mapping = Registry::open(&path).read_current_mapping().unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_lookup_reuses_existing_assignment() {
        let mut mapping = HashMap::new();
        mapping.insert(
            "cli/wf/v1/p/all/001".to_string(),
            "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
        );

        let (uid, is_new) = Registry::lookup_or_assign(&mapping, "cli/wf/v1/p/all/001");
        assert_eq!(uid, "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert!(!is_new);
    }

    #[test]
    fn test_lookup_mints_valid_uid_for_unknown_key() {
        let mapping = HashMap::new();
        let (uid, is_new) = Registry::lookup_or_assign(&mapping, "cli/wf/v1/p/all/001");

        assert!(is_new);
        assert!(id::validate_uid(&uid));
    }

    #[test]
    fn test_append_writes_one_line_per_entry() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::open(temp_dir.path().join("atoms.registry.jsonl"));

        let entries = vec![
            sample_entry("cli/wf/v1/p/all/001", "01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            sample_entry("cli/wf/v1/p/all/002", "01K6W1BSSCAZGCG5M81WJHRSXK"),
        ];
        let appended = registry.append_entries(&entries).unwrap();
        assert_eq!(appended, 2);

        let content = fs::read_to_string(registry.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));

        let read_back = registry.read_entries().unwrap();
        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].atom_key, "cli/wf/v1/p/all/001");
        assert_eq!(read_back[1].atom_key, "cli/wf/v1/p/all/002");
    }

    #[test]
    fn test_append_empty_batch_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::open(temp_dir.path().join("atoms.registry.jsonl"));

        assert_eq!(registry.append_entries(&[]).unwrap(), 0);
        assert!(!registry.path().exists());
    }

    #[test]
    fn test_append_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("atoms.registry.jsonl");
        let registry = Registry::open(&path);

        registry
            .append_entries(&[sample_entry(
                "cli/wf/v1/p/all/001",
                "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            )])
            .unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_lock_file_removed_after_append() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::open(temp_dir.path().join("atoms.registry.jsonl"));

        registry
            .append_entries(&[sample_entry(
                "cli/wf/v1/p/all/001",
                "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            )])
            .unwrap();

        assert!(!registry.lock_path().exists());
    }

    #[test]
    fn test_appends_accumulate_across_batches() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::open(temp_dir.path().join("atoms.registry.jsonl"));

        registry
            .append_entries(&[sample_entry(
                "cli/wf/v1/p/all/001",
                "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            )])
            .unwrap();
        registry
            .append_entries(&[sample_entry(
                "cli/wf/v1/p/all/002",
                "01K6W1BSSCAZGCG5M81WJHRSXK",
            )])
            .unwrap();

        let mapping = registry.read_current_mapping().unwrap();
        assert_eq!(mapping.len(), 2);
    }
}
