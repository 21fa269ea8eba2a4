//! Atom generation pipeline.
//!
//! Takes the drafts parsed from a process document and materializes
//! them: stable keys, uids reused from the registry where the key is
//! already known, one JSON file per atom under a deterministic
//! directory layout, and a registry append recording the batch.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::id::{build_key, slugify, validate_key, validate_uid};
use crate::registry::{EntryAction, Registry, RegistryEntry};
use crate::schema::{self, AtomRecord, SchemaError};

use super::errors::{ConvertError, ConvertResult};
use super::process_doc::AtomDraft;

/// Where and how a generation run writes.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub namespace: String,
    pub workflow: String,
    pub version: String,
    pub atoms_dir: PathBuf,
    pub registry_path: PathBuf,
    pub dry_run: bool,
}

/// What one generation run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub created: usize,
    pub updated: usize,
    pub files: Vec<String>,
    pub registry_appended: usize,
}

/// Generate atom files and registry entries for a set of drafts.
///
/// Keys already present in the registry keep their uid and are recorded
/// as `upsert`; unknown keys get a fresh uid and an `insert` entry. The
/// `created`/`updated` split instead reflects whether the atom file
/// already existed on disk. Every written file is re-validated before
/// the registry append; a dry run creates the directory layout but
/// writes neither files nor registry entries.
pub fn generate(drafts: &[AtomDraft], options: &PipelineOptions) -> ConvertResult<RunSummary> {
    let registry = Registry::open(&options.registry_path);
    let mapping = registry.read_current_mapping()?;

    // One timestamp per run so every atom and entry in a batch agrees.
    let now = Utc::now().to_rfc3339();

    let mut created = 0;
    let mut updated = 0;
    let mut files = Vec::new();
    let mut entries = Vec::new();

    for draft in drafts {
        let atom_key = build_key(
            &options.namespace,
            &options.workflow,
            &options.version,
            &draft.phase_slug,
            draft.lane.as_str(),
            draft.sequence,
            None,
            None,
        )?;
        if !validate_key(&atom_key) {
            return Err(ConvertError::InvalidKey(atom_key));
        }

        let (atom_uid, is_new) = Registry::lookup_or_assign(&mapping, &atom_key);
        if !validate_uid(&atom_uid) {
            return Err(ConvertError::InvalidUid(atom_uid));
        }
        let action = if is_new {
            EntryAction::Insert
        } else {
            EntryAction::Upsert
        };

        let lane_dir = options
            .atoms_dir
            .join(&options.namespace)
            .join(&options.workflow)
            .join(&options.version)
            .join(&draft.phase_slug)
            .join(draft.lane.as_str());
        // Directories are created even on a dry run.
        fs::create_dir_all(&lane_dir).map_err(|e| ConvertError::AtomWrite {
            path: lane_dir.clone(),
            source: e,
        })?;

        let file_name = format!("{:03}_{}.json", draft.sequence, slugify(&draft.raw_title, 48));
        let file_path = lane_dir.join(file_name);
        let existed = file_path.exists();

        let mut record = AtomRecord::new(&atom_uid, &atom_key, draft.display_title(), &draft.role);
        record.set_extra("source_doc", draft.source_doc.display().to_string());
        record.set_extra("mode", draft.lane.mode_str());
        record.set_extra("created_at", now.clone());

        if !options.dry_run {
            let mut json = serde_json::to_string_pretty(&record).map_err(|e| {
                ConvertError::RecordSerialize {
                    key: atom_key.clone(),
                    reason: e.to_string(),
                }
            })?;
            json.push('\n');
            fs::write(&file_path, json).map_err(|e| ConvertError::AtomWrite {
                path: file_path.clone(),
                source: e,
            })?;

            let violations = schema::validate_file(&file_path);
            if !violations.is_empty() {
                return Err(
                    SchemaError::validation_failed(file_path.display(), violations).into(),
                );
            }
        }

        entries.push(RegistryEntry::new(
            action,
            &atom_uid,
            &atom_key,
            draft.display_title(),
            &draft.role,
            draft.source_doc.display().to_string(),
            &options.version,
            &now,
        ));
        files.push(file_path.display().to_string());
        if existed {
            updated += 1;
        } else {
            created += 1;
        }
    }

    let registry_appended = if options.dry_run {
        0
    } else {
        registry.append_entries(&entries)?
    };

    Ok(RunSummary {
        created,
        updated,
        files,
        registry_appended,
    })
}
