//! Assignment registry subsystem.
//!
//! The registry is the authoritative record of key-to-uid assignment.
//! Once a key has been granted a uid, every later run must return the
//! same uid, and the only way the file ever changes is by appending.
//!
//! # Design Principles
//!
//! - Append-only: entries are never rewritten or deleted
//! - The journal is the source of truth; no side index
//! - Reads tolerate damage: bad lines are skipped, not fatal
//! - Locking is advisory and never blocks a batch forever
//!
//! # Invariants Enforced
//!
//! - A key keeps its first assigned uid for the life of the registry
//! - The current mapping is the file-order fold of all entries
//! - A batch lands as one contiguous write followed by fsync

mod entry;
mod errors;
mod store;

pub use entry::{EntryAction, RegistryEntry};
pub use errors::{RegistryError, RegistryErrorCode, RegistryResult, Severity};
pub use store::Registry;
