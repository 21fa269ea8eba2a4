//! Slug and title helpers for key segments and file names.

use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid non-alnum regex"));

static HYPHEN_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("valid hyphen run regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Reduce arbitrary text to a lowercase hyphenated slug.
///
/// Runs of anything outside `[a-z0-9]` collapse to a single hyphen,
/// leading/trailing hyphens are stripped, and the result is truncated to
/// `max_len` (stripping any hyphen the cut leaves dangling). Text that
/// reduces to nothing yields `"n-a"` so the slug is always a valid key
/// segment.
pub fn slugify(text: &str, max_len: usize) -> String {
    let lowered = text.trim().to_lowercase();
    let hyphenated = NON_ALNUM_RE.replace_all(&lowered, "-");
    let collapsed = HYPHEN_RUN_RE.replace_all(&hyphenated, "-");
    let mut slug = collapsed.trim_matches('-').to_string();

    if max_len > 0 && slug.len() > max_len {
        slug.truncate(max_len);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        "n-a".to_string()
    } else {
        slug
    }
}

/// Turn a raw atom title into a display title.
///
/// Underscores become spaces, whitespace runs collapse, and each run of
/// letters is capitalized.
pub fn titleize(text: &str) -> String {
    let spaced = text.replace('_', " ");
    let collapsed = WHITESPACE_RE.replace_all(spaced.trim(), " ");

    let mut out = String::with_capacity(collapsed.len());
    let mut prev_alpha = false;
    for c in collapsed.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello, World!", 64), "hello-world");
        assert_eq!(slugify("Detect Entry Point", 64), "detect-entry-point");
        assert_eq!(slugify("already-a-slug", 64), "already-a-slug");
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("a  --  b", 64), "a-b");
        assert_eq!(slugify("--leading and trailing--", 64), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_truncates_and_strips_dangling_hyphen() {
        // Cut lands right after "quick", leaving a dangling hyphen.
        assert_eq!(slugify("the quick brown fox", 10), "the-quick");
        assert_eq!(slugify("abcdef", 3), "abc");
    }

    #[test]
    fn test_slugify_empty_fallback() {
        assert_eq!(slugify("", 64), "n-a");
        assert_eq!(slugify("!!!", 64), "n-a");
        assert_eq!(slugify("   ", 64), "n-a");
    }

    #[test]
    fn test_slugify_result_is_valid_segment() {
        let slug = slugify("PHASE 0: ENTRY (2 atoms)", 64);
        assert_eq!(slug, "phase-0-entry-2-atoms");
        assert!(crate::id::validate_key(&format!("cli/{}/v1/init/all/001", slug)));
    }

    #[test]
    fn test_titleize_underscores_and_case() {
        assert_eq!(titleize("detect_entry"), "Detect Entry");
        assert_eq!(titleize("qa_test_agent"), "Qa Test Agent");
        assert_eq!(titleize("ALL CAPS TITLE"), "All Caps Title");
    }

    #[test]
    fn test_titleize_collapses_whitespace() {
        assert_eq!(titleize("  spaced   out  "), "Spaced Out");
    }

    #[test]
    fn test_titleize_capitalizes_after_non_letters() {
        assert_eq!(titleize("parse-config file"), "Parse-Config File");
    }
}
