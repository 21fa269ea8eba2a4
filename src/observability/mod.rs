//! Observability subsystem.
//!
//! Structured JSON logging for pipeline, validation, and registry
//! events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//! 4. Deterministic key ordering

mod logger;

pub use logger::{Logger, Severity};
