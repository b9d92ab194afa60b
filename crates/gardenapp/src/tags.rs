//! Tag normalization.
//!
//! Tags are written by hand in frontmatter, often with namespace prefixes picked up
//! from the note-taking app (`topic/rust`, `s/reading`) and inconsistent separators
//! (`machine learning` vs `machine-learning`). Before any comparison, tags go through
//! [`normalize_tag`]:
//!
//! 1. Trim and lowercase.
//! 2. Strip one namespace prefix (`topic/`, `s/`, `t/`).
//! 3. Collapse runs of whitespace and hyphens into a single hyphen.
//! 4. Drop empty results and the structural tags (`post`, `til`, `note`, `bookmark`),
//!    which classify entries rather than describe them.
//!
//! [`clean_tags`] applies this to a whole list and returns a sorted, deduplicated set.

use std::collections::BTreeSet;

/// Tags that only mark an entry's kind and never show up in tag facets.
pub const STRUCTURAL_TAGS: &[&str] = &["post", "til", "note", "bookmark"];

/// Namespace prefixes stripped from the front of a tag.
pub const NAMESPACE_PREFIXES: &[&str] = &["topic/", "s/", "t/"];

/// Tag that marks an entry as private regardless of its `private` flag.
pub const PRIVATE_TAG: &str = "private";

/// Normalizes a single raw tag. Returns `None` for tags that should be dropped.
///
/// ```
/// use gardenapp::tags::normalize_tag;
///
/// assert_eq!(normalize_tag("Topic/Machine Learning"), Some("machine-learning".to_string()));
/// assert_eq!(normalize_tag("post"), None);
/// assert_eq!(normalize_tag("   "), None);
/// ```
pub fn normalize_tag(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let unprefixed = NAMESPACE_PREFIXES
        .iter()
        .find_map(|prefix| lowered.strip_prefix(prefix))
        .unwrap_or(&lowered);

    let mut normalized = String::with_capacity(unprefixed.len());
    let mut pending_separator = false;
    for ch in unprefixed.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !normalized.is_empty() {
            normalized.push('-');
        }
        pending_separator = false;
        normalized.push(ch);
    }

    if normalized.is_empty() || STRUCTURAL_TAGS.contains(&normalized.as_str()) {
        return None;
    }
    Some(normalized)
}

/// Cleans a raw tag list into a sorted set of normalized tags.
///
/// Accepts anything iterable over string-likes; pass an empty iterator for entries
/// without tags.
pub fn clean_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Human-readable form of a normalized tag (hyphens shown as spaces).
pub fn display_tag(tag: &str) -> String {
    tag.replace('-', " ")
}
