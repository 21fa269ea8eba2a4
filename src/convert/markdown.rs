//! Single-document markdown conversion.
//!
//! Turns one markdown file with `## Section` headings into a validated
//! atom record. Recognized sections are `description`, `role`, `inputs`,
//! `outputs`, and `dependencies` (or `deps`); the `# Title` heading is
//! required. Pragmas supplied by the caller override the role and pass
//! through as extension fields.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::id::{build_key, generate_uid, validate_key, validate_uid};
use crate::observability::Logger;
use crate::schema::{AtomRecord, Dep};

use super::errors::{ConvertError, ConvertResult};

static NUMBERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("valid numbered item regex"));

/// Components of the atom key the caller chose for a converted file.
#[derive(Debug, Clone)]
pub struct KeyParts {
    pub namespace: String,
    pub workflow: String,
    pub version: String,
    pub phase: String,
    pub lane: String,
    pub sequence: u32,
    pub variant: Option<String>,
    pub revision: Option<u32>,
}

/// Split markdown text into named sections.
///
/// `## Name` opens a section whose name is lowercased and trimmed; the
/// lines under it (joined and trimmed) become its value. A `# Title`
/// line stores the title and closes any open section. Text before the
/// first heading is dropped, and a later section with the same name
/// replaces the earlier one. Sections are only stored once they have
/// at least one content line.
pub fn parse_markdown_sections(md_text: &str) -> HashMap<String, String> {
    fn flush(
        sections: &mut HashMap<String, String>,
        current: &mut Option<String>,
        lines: &mut Vec<String>,
    ) {
        if let Some(name) = current.take() {
            if !lines.is_empty() {
                sections.insert(name, lines.join("\n").trim().to_string());
            }
        }
        lines.clear();
    }

    let mut sections = HashMap::new();
    let mut current: Option<String> = None;
    let mut content: Vec<String> = Vec::new();

    for line in md_text.lines() {
        if let Some(rest) = line.strip_prefix("## ") {
            flush(&mut sections, &mut current, &mut content);
            current = Some(rest.trim().to_lowercase());
        } else if let Some(rest) = line.strip_prefix("# ") {
            flush(&mut sections, &mut current, &mut content);
            sections.insert("title".to_string(), rest.trim().to_string());
        } else if current.is_some() {
            content.push(line.to_string());
        }
    }
    flush(&mut sections, &mut current, &mut content);

    sections
}

/// Pull list items out of a section body.
///
/// Accepts `-`, `*`, and `+` bullets plus `1.`-style numbered items;
/// empty items are dropped.
pub fn extract_list_items(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    for line in text.lines() {
        let stripped = line.trim();
        let item = if let Some(rest) = stripped
            .strip_prefix("- ")
            .or_else(|| stripped.strip_prefix("* "))
            .or_else(|| stripped.strip_prefix("+ "))
        {
            rest.trim()
        } else if let Some(m) = NUMBERED_ITEM_RE.find(stripped) {
            stripped[m.end()..].trim()
        } else {
            continue;
        };
        if !item.is_empty() {
            items.push(item.to_string());
        }
    }
    items
}

/// Convert one markdown file into an atom record.
///
/// A fresh uid is assigned on every call; the key comes from `parts`.
/// Dependency items that do not parse as uids are logged and dropped
/// rather than failing the conversion. Pragmas other than `role` become
/// extension fields unless the record already carries that field.
///
/// # Errors
///
/// Fails when the file cannot be read, has no `# Title` heading, or the
/// key components produce an invalid key.
pub fn markdown_to_atom(
    md_path: &Path,
    parts: &KeyParts,
    pragmas: &[(String, String)],
) -> ConvertResult<AtomRecord> {
    let path_text = md_path.display().to_string();
    Logger::info("convert.start", &[("file", path_text.as_str())]);

    let md_text = fs::read_to_string(md_path).map_err(|e| ConvertError::DocRead {
        path: md_path.to_path_buf(),
        source: e,
    })?;
    let sections = parse_markdown_sections(&md_text);

    let title = sections
        .get("title")
        .cloned()
        .ok_or_else(|| ConvertError::MissingTitle(path_text.clone()))?;

    let atom_uid = generate_uid();
    if !validate_uid(&atom_uid) {
        return Err(ConvertError::InvalidUid(atom_uid));
    }

    let atom_key = build_key(
        &parts.namespace,
        &parts.workflow,
        &parts.version,
        &parts.phase,
        &parts.lane,
        parts.sequence,
        parts.variant.as_deref(),
        parts.revision,
    )?;
    if !validate_key(&atom_key) {
        return Err(ConvertError::InvalidKey(atom_key));
    }

    let pragma_role = pragmas
        .iter()
        .find(|(k, _)| k == "role")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let role = pragma_role.unwrap_or_else(|| {
        sections
            .get("role")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "task".to_string())
    });

    let mut record = AtomRecord::new(&atom_uid, &atom_key, title, role);

    if let Some(description) = sections.get("description").filter(|s| !s.is_empty()) {
        record.description = Some(description.clone());
    }

    if let Some(inputs) = sections.get("inputs") {
        let items = extract_list_items(inputs);
        if !items.is_empty() {
            record.inputs = Some(items);
        }
    }
    if let Some(outputs) = sections.get("outputs") {
        let items = extract_list_items(outputs);
        if !items.is_empty() {
            record.outputs = Some(items);
        }
    }

    if let Some(dep_text) = sections.get("dependencies").or_else(|| sections.get("deps")) {
        let mut deps = Vec::new();
        for item in extract_list_items(dep_text) {
            if validate_uid(&item) {
                deps.push(Dep::Uid(item));
            } else {
                Logger::warn(
                    "convert.invalid_dep",
                    &[("dep", item.as_str()), ("file", path_text.as_str())],
                );
            }
        }
        if !deps.is_empty() {
            record.deps = Some(deps);
        }
    }

    for (key, value) in pragmas {
        if key != "role" && !record.has_field(key) {
            record.set_extra(key.clone(), value.clone());
        }
    }

    Logger::info(
        "convert.done",
        &[
            ("file", path_text.as_str()),
            ("atom_uid", atom_uid.as_str()),
            ("atom_key", atom_key.as_str()),
        ],
    );

    Ok(record)
}
