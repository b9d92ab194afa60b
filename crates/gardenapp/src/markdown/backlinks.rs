//! Backlinks: which entries wiki-link to a given entry.
//!
//! Entries are matched on the slug of the last path segment of their id, the
//! same way a wiki link target is resolved, so `[[notes/rust]]` and `[[Rust]]`
//! both point at an entry whose id ends in `rust`. Self links are ignored.

use std::collections::{BTreeMap, BTreeSet};

use super::text::{wiki_target_slug, WIKI_LINK_RE};
use crate::model::Entry;
use crate::slug::github_slug;

/// The slug other entries use to link to `entry`.
pub fn link_slug(entry: &Entry) -> String {
    let id = entry.id().trim_matches('/');
    github_slug(id.rsplit('/').next().unwrap_or(id))
}

/// Slugs of every page a markdown body wiki-links to, deduplicated, in order
/// of first appearance.
pub fn wiki_link_targets(body: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    WIKI_LINK_RE
        .captures_iter(body)
        .filter_map(|caps| caps.name("target"))
        .map(|m| wiki_target_slug(m.as_str()))
        .filter(|slug| !slug.is_empty() && seen.insert(slug.clone()))
        .collect()
}

/// Maps each linked-to slug to the ids of the entries linking to it, in input
/// order.
pub fn backlink_index<E: AsRef<Entry>>(entries: &[E]) -> BTreeMap<String, Vec<String>> {
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in entries {
        let entry = entry.as_ref();
        let own = link_slug(entry);
        for target in wiki_link_targets(&entry.base.body) {
            if target == own {
                continue;
            }
            index.entry(target).or_default().push(entry.id().to_string());
        }
    }
    index
}
