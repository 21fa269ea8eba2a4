//! CLI module for atomreg
//!
//! Provides the command-line interface for:
//! - process: generate atoms from process documents and update the registry
//! - convert: turn one markdown file into an atom record
//! - validate: schema-check atom files
//! - registry: inspect the key-to-uid journal

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ConvertArgs, ProcessArgs, RegistryAction, ValidateArgs};
pub use commands::{convert_file, process, registry, run, run_command, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
