//! Identifier generation and key construction.
//!
//! Two string grammars live here:
//!
//! - `atom_uid`: a 26-character ULID over the crockford base32 alphabet
//!   (digits plus uppercase letters excluding I, L, O, U). Lexicographic
//!   order follows creation time.
//! - `atom_key`: six slash-separated segments,
//!   `namespace/workflow/version/phase/lane/sequence[-variant][-r<N>]`.
//!
//! Validation is deliberately case-sensitive: lowercase identifiers are
//! rejected even though crockford base32 decoders would accept them.

use std::sync::LazyLock;

use regex::Regex;
use ulid::Ulid;

use super::errors::{IdError, IdResult};

/// Length of every atom identifier.
pub const UID_LENGTH: usize = 26;

/// Highest sequence number a key can carry (three decimal digits).
pub const MAX_SEQUENCE: u32 = 999;

static UID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-HJKMNP-TV-Z]{26}$").expect("valid uid regex"));

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9-]+/[a-z0-9-]+/v[0-9]+/[a-z0-9-]+/[a-z0-9-]+/[0-9]{3}(-[a-z0-9-]+)?(-r[0-9]+)?$")
        .expect("valid key regex")
});

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid segment regex"));

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v[0-9]+$").expect("valid version regex"));

/// Generate a fresh atom identifier.
///
/// Identifiers are time-ordered: generating in rapid succession yields
/// distinct, lexicographically increasing strings.
pub fn generate_uid() -> String {
    Ulid::new().to_string()
}

/// Check a string against the atom identifier grammar.
///
/// Exactly 26 characters, crockford base32, uppercase only.
pub fn validate_uid(uid: &str) -> bool {
    UID_RE.is_match(uid)
}

/// Check a string against the atom key grammar.
pub fn validate_key(key: &str) -> bool {
    KEY_RE.is_match(key)
}

/// Construct an atom key from its components.
///
/// The sequence renders as three zero-padded digits (0 becomes `000`).
/// `variant` appends as `-{variant}` and `revision` as `-r{revision}`,
/// in that order. Variant content is not re-checked here: a malformed
/// variant produces a key that fails [`validate_key`], which callers
/// must check before persisting.
///
/// # Errors
///
/// Returns an [`IdError`] if a segment falls outside `[a-z0-9-]+`, the
/// version is not `v` followed by digits, or the sequence exceeds 999.
pub fn build_key(
    namespace: &str,
    workflow: &str,
    version: &str,
    phase: &str,
    lane: &str,
    sequence: u32,
    variant: Option<&str>,
    revision: Option<u32>,
) -> IdResult<String> {
    for (name, value) in [
        ("namespace", namespace),
        ("workflow", workflow),
        ("phase", phase),
        ("lane", lane),
    ] {
        if !SEGMENT_RE.is_match(value) {
            return Err(IdError::invalid_segment(name, value));
        }
    }

    if !VERSION_RE.is_match(version) {
        return Err(IdError::invalid_version(version));
    }

    if sequence > MAX_SEQUENCE {
        return Err(IdError::sequence_range(sequence));
    }

    let mut key = format!(
        "{}/{}/{}/{}/{}/{:03}",
        namespace, workflow, version, phase, lane, sequence
    );

    if let Some(variant) = variant {
        key.push('-');
        key.push_str(variant);
    }

    if let Some(revision) = revision {
        key.push_str("-r");
        key.push_str(&revision.to_string());
    }

    Ok(key)
}
