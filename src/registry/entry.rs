//! Registry journal entry shape.

use serde::{Deserialize, Serialize};

/// Whether an entry introduced its key or re-recorded an existing
/// assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryAction {
    Insert,
    Upsert,
}

/// One line of the append-only registry journal.
///
/// The journal is the source of truth for uid assignment: the current
/// mapping is always recovered by folding entries in file order, so an
/// entry is never rewritten once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub action: EntryAction,
    pub atom_uid: String,
    pub atom_key: String,
    pub title: String,
    pub role: String,
    pub source_doc: String,
    pub version: String,
    pub timestamp: String,
}

impl RegistryEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        action: EntryAction,
        atom_uid: impl Into<String>,
        atom_key: impl Into<String>,
        title: impl Into<String>,
        role: impl Into<String>,
        source_doc: impl Into<String>,
        version: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            action,
            atom_uid: atom_uid.into(),
            atom_key: atom_key.into(),
            title: title.into(),
            role: role.into(),
            source_doc: source_doc.into(),
            version: version.into(),
            timestamp: timestamp.into(),
        }
    }
}
