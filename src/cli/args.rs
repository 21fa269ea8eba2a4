//! CLI argument definitions using clap
//!
//! Commands:
//! - atomreg process --doc <file> | --docs-dir <dir>
//! - atomreg convert <input> --namespace .. --workflow .. --version .. --phase .. --lane .. --sequence ..
//! - atomreg validate <paths>... [--strict]
//! - atomreg registry lookup --key <key> | list

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// atomreg - atom identity, conversion, and registry tooling
#[derive(Parser, Debug)]
#[command(name = "atomreg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate atoms from process documents and update the registry
    Process(ProcessArgs),

    /// Convert a single markdown file into an atom record
    Convert(ConvertArgs),

    /// Validate atom files against the schema
    Validate(ValidateArgs),

    /// Inspect the registry journal
    Registry {
        #[command(subcommand)]
        action: RegistryAction,
    },
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Path to a process markdown document
    #[arg(long)]
    pub doc: Option<PathBuf>,

    /// Process every .md directly under this directory (non-recursive)
    #[arg(long)]
    pub docs_dir: Option<PathBuf>,

    /// Key namespace (e.g. cli, hp)
    #[arg(long, default_value = "cli")]
    pub namespace: String,

    /// Workflow slug (defaults to the slugified document title)
    #[arg(long)]
    pub workflow: Option<String>,

    /// Workflow version (e.g. v1)
    #[arg(long, default_value = "v1")]
    pub version: String,

    /// Output atoms directory root
    #[arg(long, default_value = "atoms")]
    pub atoms_dir: PathBuf,

    /// Path to the append-only registry journal
    #[arg(long, default_value = "atoms.registry.jsonl")]
    pub registry: PathBuf,

    /// Report what would be written without touching files or registry
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input markdown file
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Key namespace (e.g. cli)
    #[arg(long)]
    pub namespace: String,

    /// Workflow slug (e.g. dev-setup)
    #[arg(long)]
    pub workflow: String,

    /// Version (e.g. v1)
    #[arg(long)]
    pub version: String,

    /// Phase (e.g. init, exec, val)
    #[arg(long)]
    pub phase: String,

    /// Lane (e.g. all, ai, det)
    #[arg(long)]
    pub lane: String,

    /// Sequence number
    #[arg(long)]
    pub sequence: u32,

    /// Optional variant (e.g. win, linux)
    #[arg(long)]
    pub variant: Option<String>,

    /// Optional revision number
    #[arg(long)]
    pub revision: Option<u32>,

    /// Override role (default: task)
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to validate
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Exit with an error code on validation failure
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum RegistryAction {
    /// Print the uid currently mapped to a key
    Lookup {
        /// Atom key to look up
        #[arg(long)]
        key: String,

        /// Path to the registry journal
        #[arg(long, default_value = "atoms.registry.jsonl")]
        registry: PathBuf,
    },

    /// Print the full current key-to-uid mapping
    List {
        /// Path to the registry journal
        #[arg(long, default_value = "atoms.registry.jsonl")]
        registry: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
