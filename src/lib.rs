//! atomreg - atom identity, conversion, and registry tooling
//!
//! Turns workflow markdown into validated atom records with stable
//! identities, tracked in an append-only registry journal.

pub mod cli;
pub mod convert;
pub mod id;
pub mod observability;
pub mod registry;
pub mod schema;
