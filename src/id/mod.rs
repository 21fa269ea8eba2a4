//! Identifier codec subsystem for atomreg
//!
//! Generates and validates the two identity strings every atom carries:
//! the 26-character sortable `atom_uid` and the structured `atom_key`
//! coordinate. Also home to the slug helpers converters use to derive
//! key segments from free text.
//!
//! # Design Principles
//!
//! - Pure functions, no I/O, no shared state
//! - Grammar checks are exact regular-expression matches
//! - Case sensitivity is deliberate: lowercase identifiers are rejected
//! - Key construction validates segments; suffixes are caller-checked
//!
//! # Invariants Enforced
//!
//! - Generated identifiers always pass their own validation
//! - Identifiers sort lexicographically by creation time
//! - Sequence numbers render as exactly three zero-padded digits

mod codec;
mod errors;
mod slug;

pub use codec::{build_key, generate_uid, validate_key, validate_uid, MAX_SEQUENCE, UID_LENGTH};
pub use errors::{IdError, IdErrorCode, IdResult};
pub use slug::{slugify, titleize};
