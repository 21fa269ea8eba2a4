//! Process-document parsing.
//!
//! A process document is Markdown describing a workflow as numbered
//! `## PHASE <n>: <title>` sections. Subsection headings may carry an
//! `[AI MAKES DECISIONS]` or `[DETERMINISTIC]` tag that switches the
//! current lane, and fenced code blocks list the atoms themselves as
//! `atom_<seq>: <title> | Role: <role>` lines. Parsing is line-oriented
//! and case-insensitive throughout.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::id::{slugify, titleize};
use crate::observability::Logger;

use super::errors::{ConvertError, ConvertResult};

static PHASE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^##\s*PHASE\s*(?P<num>\d+)\s*:\s*(?P<title>.+?)\s*$")
        .expect("valid phase header regex")
});

static SUBSECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^###\s*(?P<title>.*?)\s*(?:\[(?P<tag>AI MAKES DECISIONS|DETERMINISTIC)\])?.*$")
        .expect("valid subsection regex")
});

static ATOM_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*atom_(?P<seq>\d{3})\s*:\s*(?P<title>[^|]+?)\s*\|\s*Role\s*:\s*(?P<role>.+?)\s*$")
        .expect("valid atom line regex")
});

static AI_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*AI MAKES DECISIONS\s*\]").expect("valid ai tag regex"));

static DET_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*DETERMINISTIC\s*\]").expect("valid det tag regex"));

/// Execution lane an atom belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Ai,
    Det,
    All,
}

impl Lane {
    /// Key segment for this lane.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Ai => "ai",
            Lane::Det => "det",
            Lane::All => "all",
        }
    }

    /// Extension-field value recorded on generated atoms.
    pub fn mode_str(&self) -> &'static str {
        match self {
            Lane::Ai => "ai",
            Lane::Det => "deterministic",
            Lane::All => "unspecified",
        }
    }
}

/// Map a subsection tag to a lane.
pub fn map_tag_to_lane(tag: Option<&str>) -> Lane {
    let Some(tag) = tag else {
        return Lane::All;
    };
    let tag_norm = tag.trim().to_lowercase();
    if tag_norm.contains("ai makes decisions") {
        Lane::Ai
    } else if tag_norm.contains("deterministic") {
        Lane::Det
    } else {
        Lane::All
    }
}

/// One atom definition parsed from a process document.
#[derive(Debug, Clone)]
pub struct AtomDraft {
    pub phase_slug: String,
    pub lane: Lane,
    pub sequence: u32,
    pub raw_title: String,
    pub role: String,
    pub source_doc: PathBuf,
}

impl AtomDraft {
    /// Title as written into the generated record.
    pub fn display_title(&self) -> String {
        titleize(&self.raw_title)
    }
}

/// Parse a process document into its workflow title and atom drafts.
///
/// The workflow title comes from the first `# ` heading, falling back
/// to the slugified file stem with hyphens turned into spaces. A phase
/// slug is `p{num:02}-{slugified title}`. The current lane persists
/// across phase boundaries until the next tagged subsection. Atom lines
/// count only inside code fences and only once a phase is open.
///
/// Drafts are deduplicated by `(phase, lane, sequence)` keeping the
/// last occurrence, then sorted by that triple.
pub fn parse_process_doc(doc_path: &Path) -> ConvertResult<(String, Vec<AtomDraft>)> {
    let text = fs::read_to_string(doc_path).map_err(|e| ConvertError::DocRead {
        path: doc_path.to_path_buf(),
        source: e,
    })?;
    let lines: Vec<&str> = text.lines().collect();

    let workflow_title = lines
        .iter()
        .find(|line| line.starts_with("# "))
        .map(|line| line[2..].trim().to_string());

    let mut current_phase_slug: Option<String> = None;
    let mut current_lane = Lane::All;
    let mut in_code = false;
    let mut atoms: Vec<AtomDraft> = Vec::new();

    for line in &lines {
        if let Some(caps) = PHASE_HEADER_RE.captures(line) {
            let num: u32 = caps["num"].parse().unwrap_or(0);
            let title = caps["title"].trim().to_string();
            let phase_slug = format!("p{:02}-{}", num, slugify(&title, 64));
            Logger::info("phase.detected", &[("phase", &phase_slug)]);
            current_phase_slug = Some(phase_slug);
            continue;
        }

        if let Some(caps) = SUBSECTION_RE.captures(line) {
            let mut tag = caps.name("tag").map(|m| m.as_str().to_string());
            // Fallback: scan the line for known tags the capture missed
            if tag.is_none() {
                let raw_line = line.trim();
                if AI_TAG_RE.is_match(raw_line) {
                    tag = Some("AI MAKES DECISIONS".to_string());
                } else if DET_TAG_RE.is_match(raw_line) {
                    tag = Some("DETERMINISTIC".to_string());
                }
            }
            current_lane = map_tag_to_lane(tag.as_deref());
            Logger::info(
                "subsection.detected",
                &[
                    ("lane", current_lane.as_str()),
                    ("title", caps["title"].trim()),
                    ("tag", tag.as_deref().unwrap_or("")),
                ],
            );
            continue;
        }

        if line.trim().starts_with("```") {
            in_code = !in_code;
            continue;
        }

        if in_code {
            if let Some(caps) = ATOM_LINE_RE.captures(line) {
                if let Some(phase_slug) = &current_phase_slug {
                    let sequence: u32 = caps["seq"].parse().unwrap_or(0);
                    atoms.push(AtomDraft {
                        phase_slug: phase_slug.clone(),
                        lane: current_lane,
                        sequence,
                        raw_title: caps["title"].trim().to_string(),
                        role: caps["role"].trim().to_lowercase().replace(' ', "_"),
                        source_doc: doc_path.to_path_buf(),
                    });
                }
            }
        }
    }

    // Dedup by (phase, lane, sequence) keeping the last occurrence
    let mut dedup: HashMap<(String, Lane, u32), AtomDraft> = HashMap::new();
    for atom in atoms {
        dedup.insert((atom.phase_slug.clone(), atom.lane, atom.sequence), atom);
    }
    let mut drafts: Vec<AtomDraft> = dedup.into_values().collect();
    drafts.sort_by(|a, b| {
        (&a.phase_slug, a.lane.as_str(), a.sequence)
            .cmp(&(&b.phase_slug, b.lane.as_str(), b.sequence))
    });

    let workflow_title = workflow_title.unwrap_or_else(|| {
        let stem = doc_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        slugify(&stem, 64).replace('-', " ")
    });

    Ok((workflow_title, drafts))
}
