//! YAML frontmatter extraction.
//!
//! A content file is an optional YAML block fenced by `---` lines followed by the
//! markdown body. A leading byte-order mark is ignored, and the closing fence may
//! also be `...`. Files without a fence have default (empty) frontmatter.

use crate::error::{GardenError, Result};
use crate::model::Frontmatter;

/// Splits a document into its raw YAML block and body.
///
/// Returns `None` when the document does not start with a `---` fence or the
/// fence is never closed.
pub fn split_frontmatter(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start_matches('\u{feff}');
    let first_line_end = input.find('\n')?;
    if input[..first_line_end].trim_end() != "---" {
        return None;
    }

    let rest = &input[first_line_end + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Parses a full document into frontmatter and body.
///
/// `origin` is only used for error messages.
pub fn parse_document(input: &str, origin: &str) -> Result<(Frontmatter, String)> {
    let Some((yaml, body)) = split_frontmatter(input) else {
        return Ok((Frontmatter::default(), input.to_string()));
    };

    if yaml.trim().is_empty() {
        return Ok((Frontmatter::default(), body.to_string()));
    }

    let frontmatter: Frontmatter =
        serde_yaml::from_str(yaml).map_err(|e| GardenError::Frontmatter {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
    Ok((frontmatter, body.to_string()))
}
