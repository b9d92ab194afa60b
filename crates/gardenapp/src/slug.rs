//! GitHub-compatible slugs.
//!
//! Ids and heading anchors follow the same rules GitHub uses for heading anchors:
//! lowercase, drop punctuation (keeping `-` and `_`), spaces become hyphens.
//! Consecutive spaces are not collapsed.

/// Slugs a single segment.
///
/// ```
/// use gardenapp::slug::github_slug;
///
/// assert_eq!(github_slug("Hello, World!"), "hello-world");
/// assert_eq!(github_slug("snake_case stays"), "snake_case-stays");
/// ```
pub fn github_slug(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Slugs a relative path segment by segment, dropping the extension and a
/// trailing `index` segment.
pub fn path_slug(relative: &str) -> String {
    let normalized = relative.replace('\\', "/");
    let without_ext = match normalized.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem.to_string(),
        _ => normalized,
    };

    let segments: Vec<String> = without_ext
        .split('/')
        .filter(|s| !s.is_empty())
        .map(github_slug)
        .collect();

    let mut slug = segments.join("/");
    if slug == "index" {
        return String::new();
    }
    if let Some(stripped) = slug.strip_suffix("/index") {
        slug = stripped.to_string();
    }
    slug
}
