//! Atom record model.
//!
//! The typed shape converters assemble and persist. Required identity
//! fields come first, optional descriptive fields after, and anything
//! else a converter carries (pragmas, provenance metadata) lands in the
//! open `extra` map, serialized after the typed fields in insertion
//! order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dependency reference inside an atom record.
///
/// Either a bare identifier string or a structured entry that exposes a
/// `uid` field alongside arbitrary other keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dep {
    /// Bare identifier
    Uid(String),
    /// Structured entry carrying at least a `uid`
    Entry {
        uid: String,
        #[serde(flatten)]
        rest: Map<String, Value>,
    },
}

impl Dep {
    /// The referenced identifier, whichever shape carries it
    pub fn uid(&self) -> &str {
        match self {
            Dep::Uid(uid) => uid,
            Dep::Entry { uid, .. } => uid,
        }
    }
}

/// A validated unit of work.
///
/// `atom_uid` and `atom_key` are the identity pair: the uid is assigned
/// once and never changes, the key is the human-readable coordinate.
/// `inputs` and `outputs` keep their declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub atom_uid: String,
    pub atom_key: String,
    pub title: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<Vec<Dep>>,
    /// Extension fields passed through untyped, in insertion order
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AtomRecord {
    /// Create a record with the four required fields set
    pub fn new(
        atom_uid: impl Into<String>,
        atom_key: impl Into<String>,
        title: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            atom_uid: atom_uid.into(),
            atom_key: atom_key.into(),
            title: title.into(),
            role: role.into(),
            description: None,
            inputs: None,
            outputs: None,
            deps: None,
            extra: Map::new(),
        }
    }

    /// Attach an extension field
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Whether the record already carries a field with this name,
    /// typed or extension
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "atom_uid" | "atom_key" | "title" | "role" => true,
            "description" => self.description.is_some(),
            "inputs" => self.inputs.is_some(),
            "outputs" => self.outputs.is_some(),
            "deps" => self.deps.is_some(),
            other => self.extra.contains_key(other),
        }
    }
}
