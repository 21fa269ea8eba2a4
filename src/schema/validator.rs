//! Atom record validation.
//!
//! The core check is [`validate`]: a pure function over an untyped
//! parsed document that collects every violation instead of stopping at
//! the first, so a caller sees all problems in a record at once. An
//! empty list means the record conforms and may be persisted; a
//! non-empty list means it must not be.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::id;
use crate::observability::Logger;

use super::errors::ValidationError;
use super::record::AtomRecord;

/// Validate a parsed atom document against the record schema.
///
/// Rules, each checked independently:
/// - `atom_uid` present and a valid identifier
/// - `atom_key` present and a valid key
/// - `title` and `role` present, string-typed, non-empty
/// - `deps`, if present, a list of identifier strings or entries with a
///   `uid` field
/// - `inputs` and `outputs`, if present, lists of strings
///
/// Anything not a map at the top level yields a single shape error.
/// Unknown fields are extension fields and pass untouched.
pub fn validate(atom: &Value) -> Vec<ValidationError> {
    let Some(map) = atom.as_object() else {
        return vec![ValidationError::not_a_map()];
    };

    let mut errors = Vec::new();

    match map.get("atom_uid") {
        None => errors.push(ValidationError::missing_field("atom_uid")),
        Some(value) => {
            if !value.as_str().is_some_and(id::validate_uid) {
                errors.push(ValidationError::invalid_uid(&value_text(value)));
            }
        }
    }

    match map.get("atom_key") {
        None => errors.push(ValidationError::missing_field("atom_key")),
        Some(value) => {
            if !value.as_str().is_some_and(id::validate_key) {
                errors.push(ValidationError::invalid_key(&value_text(value)));
            }
        }
    }

    for field in ["title", "role"] {
        match map.get(field) {
            None => errors.push(ValidationError::missing_field(field)),
            Some(value) => {
                if !value.as_str().is_some_and(|s| !s.is_empty()) {
                    errors.push(ValidationError::empty_string_field(field));
                }
            }
        }
    }

    if let Some(deps_value) = map.get("deps") {
        match deps_value.as_array() {
            None => errors.push(ValidationError::not_a_list("deps")),
            Some(deps) => {
                for (i, dep) in deps.iter().enumerate() {
                    match dep {
                        Value::String(uid) => {
                            if !id::validate_uid(uid) {
                                errors.push(ValidationError::invalid_dep_uid(i, uid));
                            }
                        }
                        Value::Object(entry) => match entry.get("uid") {
                            Some(uid) => {
                                if !uid.as_str().is_some_and(id::validate_uid) {
                                    errors
                                        .push(ValidationError::invalid_dep_uid(i, &value_text(uid)));
                                }
                            }
                            None => errors.push(ValidationError::invalid_dep_shape(i)),
                        },
                        _ => errors.push(ValidationError::invalid_dep_shape(i)),
                    }
                }
            }
        }
    }

    for field in ["inputs", "outputs"] {
        if let Some(list_value) = map.get(field) {
            match list_value.as_array() {
                None => errors.push(ValidationError::not_a_list(field)),
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_string() {
                            errors.push(ValidationError::invalid_list_item(field, i));
                        }
                    }
                }
            }
        }
    }

    errors
}

/// Validate a typed record before it is written out.
pub fn validate_record(record: &AtomRecord) -> Vec<ValidationError> {
    match serde_json::to_value(record) {
        Ok(value) => validate(&value),
        Err(e) => vec![ValidationError::new(format!(
            "Failed to serialize record: {}",
            e
        ))],
    }
}

/// Parse and validate a single persisted atom file.
///
/// A file that cannot be read or parsed yields a single parse-level
/// error rather than an I/O failure.
pub fn validate_file(path: &Path) -> Vec<ValidationError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return vec![ValidationError::parse_failed(e)],
    };

    let value: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => return vec![ValidationError::parse_failed(e)],
    };

    validate(&value)
}

/// Validate atom files under the given paths.
///
/// Files are taken as-is when they carry the atom file extension;
/// directories are walked recursively. Logs a pass/fail event per file
/// and a summary event, then returns the error lists for the files that
/// failed.
pub fn validate_paths(paths: &[PathBuf]) -> BTreeMap<PathBuf, Vec<ValidationError>> {
    let mut atom_files = Vec::new();
    for path in paths {
        collect_atom_files(path, &mut atom_files);
    }

    let mut all_errors: BTreeMap<PathBuf, Vec<ValidationError>> = BTreeMap::new();

    for atom_file in &atom_files {
        let errors = validate_file(atom_file);
        let file_text = atom_file.display().to_string();
        if errors.is_empty() {
            Logger::info("validation.passed", &[("file", &file_text)]);
        } else {
            let joined: Vec<String> = errors.iter().map(|e| e.message().to_string()).collect();
            Logger::error(
                "validation.failed",
                &[("file", &file_text), ("errors", &joined.join("; "))],
            );
            all_errors.insert(atom_file.clone(), errors);
        }
    }

    let total_files = atom_files.len().to_string();
    let failed_files = all_errors.len().to_string();
    if all_errors.is_empty() {
        Logger::info(
            "validation.summary",
            &[("failed_files", "0"), ("total_files", &total_files)],
        );
    } else {
        let total_errors: usize = all_errors.values().map(Vec::len).sum();
        Logger::error(
            "validation.summary",
            &[
                ("failed_files", &failed_files),
                ("total_errors", &total_errors.to_string()),
                ("total_files", &total_files),
            ],
        );
    }

    all_errors
}

fn collect_atom_files(path: &Path, files: &mut Vec<PathBuf>) {
    if path.is_file() {
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        let Ok(entries) = fs::read_dir(path) else {
            return;
        };
        let mut children: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        children.sort();
        for child in children {
            collect_atom_files(&child, files);
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
