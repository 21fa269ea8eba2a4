//! Atom record schema subsystem.
//!
//! Defines the persisted atom record shape and the validation rules
//! applied before a record is written or accepted.
//!
//! # Design Principles
//!
//! - Validation is pure: no I/O, no clock, no mutation of the input
//! - All violations are collected in one pass, never just the first
//! - Unknown fields are extension fields and pass through untouched
//! - Validation before persistence; a failing record is never written
//!
//! # Invariants Enforced
//!
//! - `atom_uid` and `atom_key` conform to the identifier grammars
//! - `title` and `role` are non-empty strings
//! - `deps` entries resolve to well-formed identifiers
//! - `inputs` and `outputs` are lists of strings

mod errors;
mod record;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationError};
pub use record::{AtomRecord, Dep};
pub use validator::{validate, validate_file, validate_paths, validate_record};
