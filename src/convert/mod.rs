//! Converters that turn markdown into atom records.
//!
//! Two front ends share this module:
//!
//! - Process documents: a whole workflow described phase by phase, with
//!   atom lines inside code fences. [`parse_process_doc`] extracts the
//!   drafts and [`generate`] materializes them against the registry.
//! - Single files: one markdown document per atom, converted directly
//!   by [`markdown_to_atom`] with caller-chosen key components.
//!
//! # Design Principles
//!
//! - **Parse, then act**: document parsing is pure apart from reading
//!   the source file; only the pipeline touches the atoms directory
//!   and the registry.
//! - **Lenient in, strict out**: malformed dependency items are logged
//!   and dropped, but every record is validated before it is persisted.
//! - **Stable identity**: a key seen before keeps its uid; reruns of
//!   the same document update files in place.
//!
//! # Invariants Enforced
//!
//! - Generated keys and uids pass their grammar checks before any file
//!   or registry write.
//! - Atom files land at
//!   `atoms_dir/namespace/workflow/version/phase/lane/seq_slug.json`.
//! - A dry run creates the directory layout but writes no atom files
//!   and appends no registry entries.

mod errors;
mod markdown;
mod pipeline;
mod process_doc;

pub use errors::{ConvertError, ConvertResult};
pub use markdown::{extract_list_items, markdown_to_atom, parse_markdown_sections, KeyParts};
pub use pipeline::{generate, PipelineOptions, RunSummary};
pub use process_doc::{map_tag_to_lane, parse_process_doc, AtomDraft, Lane};
