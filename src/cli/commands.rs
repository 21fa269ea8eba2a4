//! CLI command implementations
//!
//! Each command is a thin front end: resolve arguments, call into the
//! conversion, validation, or registry modules, print the result.
//! Structured logging mostly happens in the modules doing the work;
//! commands add only the pipeline lifecycle events for process runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::convert::{self, KeyParts, PipelineOptions};
use crate::id::slugify;
use crate::observability::Logger;
use crate::registry::Registry;
use crate::schema;

use super::args::{Cli, Command, ConvertArgs, ProcessArgs, RegistryAction, ValidateArgs};
use super::errors::{CliError, CliResult};
use super::io::{write_json_pretty, write_line};

/// Parse arguments and dispatch.
///
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Process(args) => process(&args),
        Command::Convert(args) => convert_file(&args),
        Command::Validate(args) => validate(&args),
        Command::Registry { action } => registry(&action),
    }
}

/// Generate atoms from one or more process documents
///
/// Documents are processed independently: a failing document is
/// recorded in the report and the remaining documents still run. The
/// overall report prints to stdout either way, and the command fails
/// if any run failed.
pub fn process(args: &ProcessArgs) -> CliResult<()> {
    let targets = process_targets(args)?;

    let mut ok = true;
    let mut runs: Vec<Value> = Vec::new();

    for doc_path in &targets {
        let doc_text = doc_path.display().to_string();

        let (workflow_title, drafts) = match convert::parse_process_doc(doc_path) {
            Ok(parsed) => parsed,
            Err(e) => {
                let error_text = e.to_string();
                Logger::error(
                    "pipeline.error",
                    &[("error", &error_text), ("doc", &doc_text)],
                );
                runs.push(json!({"doc": doc_text, "ok": false, "error": error_text}));
                ok = false;
                continue;
            }
        };

        if drafts.is_empty() {
            runs.push(json!({"doc": doc_text, "ok": false, "error": "no_atoms"}));
            ok = false;
            continue;
        }

        let workflow = args
            .workflow
            .clone()
            .unwrap_or_else(|| slugify(&workflow_title, 64));
        let atoms_count = drafts.len().to_string();
        Logger::info(
            "pipeline.start",
            &[
                ("workflow", workflow.as_str()),
                ("namespace", args.namespace.as_str()),
                ("version", args.version.as_str()),
                ("atoms_count", atoms_count.as_str()),
                ("doc", doc_text.as_str()),
            ],
        );

        let options = PipelineOptions {
            namespace: args.namespace.clone(),
            workflow: workflow.clone(),
            version: args.version.clone(),
            atoms_dir: args.atoms_dir.clone(),
            registry_path: args.registry.clone(),
            dry_run: args.dry_run,
        };

        match convert::generate(&drafts, &options) {
            Ok(summary) => {
                let created = summary.created.to_string();
                let updated = summary.updated.to_string();
                let appended = summary.registry_appended.to_string();
                Logger::info(
                    "pipeline.end",
                    &[
                        ("doc", doc_text.as_str()),
                        ("workflow", workflow.as_str()),
                        ("created", created.as_str()),
                        ("updated", updated.as_str()),
                        ("registry_appended", appended.as_str()),
                    ],
                );

                let mut res = json!({
                    "doc": doc_text,
                    "ok": true,
                    "namespace": args.namespace,
                    "workflow": workflow,
                    "version": args.version,
                });
                if let (Value::Object(res_map), Value::Object(summary_map)) =
                    (&mut res, serde_json::to_value(&summary)?)
                {
                    res_map.extend(summary_map);
                }
                runs.push(res);
            }
            Err(e) => {
                let error_text = e.to_string();
                Logger::error(
                    "pipeline.error",
                    &[("error", &error_text), ("doc", &doc_text)],
                );
                runs.push(json!({"doc": doc_text, "ok": false, "error": error_text}));
                ok = false;
            }
        }
    }

    write_json_pretty(&json!({"ok": ok, "runs": runs}))?;

    if ok {
        Ok(())
    } else {
        Err(CliError::convert_failed("one or more documents failed"))
    }
}

/// Resolve which documents a process run covers
fn process_targets(args: &ProcessArgs) -> CliResult<Vec<PathBuf>> {
    match (&args.doc, &args.docs_dir) {
        (Some(_), Some(_)) => Err(CliError::args_error(
            "--doc and --docs-dir are mutually exclusive",
        )),
        (None, None) => Err(CliError::args_error(
            "one of --doc or --docs-dir is required",
        )),
        (Some(doc), None) => {
            if !doc.exists() {
                return Err(CliError::doc_not_found(format!(
                    "Document not found: {}",
                    doc.display()
                )));
            }
            Ok(vec![doc.clone()])
        }
        (None, Some(dir)) => {
            if !dir.is_dir() {
                return Err(CliError::doc_not_found(format!(
                    "Docs dir not found: {}",
                    dir.display()
                )));
            }
            let entries = fs::read_dir(dir).map_err(|e| {
                CliError::io_error(format!("Failed to read {}: {}", dir.display(), e))
            })?;
            let mut targets: Vec<PathBuf> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
                .collect();
            if targets.is_empty() {
                return Err(CliError::doc_not_found("No .md files found in docs-dir"));
            }
            targets.sort();
            Ok(targets)
        }
    }
}

/// Convert a single markdown file and print or write the record
pub fn convert_file(args: &ConvertArgs) -> CliResult<()> {
    let parts = KeyParts {
        namespace: args.namespace.clone(),
        workflow: args.workflow.clone(),
        version: args.version.clone(),
        phase: args.phase.clone(),
        lane: args.lane.clone(),
        sequence: args.sequence,
        variant: args.variant.clone(),
        revision: args.revision,
    };

    let mut pragmas: Vec<(String, String)> = Vec::new();
    if let Some(role) = &args.role {
        pragmas.push(("role".to_string(), role.clone()));
    }

    let record = match convert::markdown_to_atom(&args.input, &parts, &pragmas) {
        Ok(record) => record,
        Err(e) => {
            let error_text = e.to_string();
            Logger::error("convert.failed", &[("error", &error_text)]);
            return Err(e.into());
        }
    };

    let mut rendered = serde_json::to_string_pretty(&record)?;
    rendered.push('\n');

    match &args.output {
        Some(output) => {
            fs::write(output, &rendered).map_err(|e| {
                CliError::io_error(format!("Failed to write {}: {}", output.display(), e))
            })?;
            Logger::info(
                "convert.written",
                &[("output", &output.display().to_string())],
            );
        }
        None => write_line(rendered.trim_end())?,
    }

    Ok(())
}

/// Validate atom files and report violations
///
/// Prints a violation listing when any file fails. Without `--strict`
/// the exit status stays zero so the listing can feed other tools.
pub fn validate(args: &ValidateArgs) -> CliResult<()> {
    let report = schema::validate_paths(&args.paths);

    if !report.is_empty() {
        write_line("\n=== Validation Errors ===")?;
        for (file_path, errors) in &report {
            write_line(&format!("\n{}:", file_path.display()))?;
            for error in errors {
                write_line(&format!("  - {}", error.message()))?;
            }
        }
        if args.strict {
            return Err(CliError::validation_failed(format!(
                "{} file(s) failed validation",
                report.len()
            )));
        }
    }

    Ok(())
}

/// Inspect the registry journal
pub fn registry(action: &RegistryAction) -> CliResult<()> {
    match action {
        RegistryAction::Lookup { key, registry } => {
            let mapping = Registry::open(registry).read_current_mapping()?;
            match mapping.get(key) {
                Some(uid) => write_line(uid),
                None => Err(CliError::key_not_found(key)),
            }
        }
        RegistryAction::List { registry } => {
            let mapping = Registry::open(registry).read_current_mapping()?;
            let sorted: BTreeMap<&String, &String> = mapping.iter().collect();
            for (key, uid) in sorted {
                write_line(&json!({"atom_key": key, "atom_uid": uid}).to_string())?;
            }
            Ok(())
        }
    }
}
