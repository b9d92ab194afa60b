//! # Tag Queries
//!
//! Filtering is conjunctive: an item matches a query when its normalized tags
//! contain every query tag. The empty query matches everything.
//!
//! Queries come from URLs and are not trusted. [`validate_tags`] normalizes them and
//! drops tags no item carries, so a typo narrows nothing instead of emptying the
//! results.
//!
//! [`facets`] gives every known tag a [`TagState`] for rendering a tag cloud:
//!
//! | State         | Meaning                                              |
//! |---------------|------------------------------------------------------|
//! | `Active`      | selected in the query                                |
//! | `Inactive`    | not selected, but selecting it would still match     |
//! | `Unavailable` | not selected, and no filtered item carries it        |

use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::model::Entry;
use crate::tags::{clean_tags, display_tag, normalize_tag};

/// Anything that carries tags.
pub trait Tagged {
    /// Normalized, sorted, unique tags.
    fn clean_tags(&self) -> Vec<String>;
}

impl Tagged for Entry {
    fn clean_tags(&self) -> Vec<String> {
        clean_tags(&self.base.tags)
    }
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn clean_tags(&self) -> Vec<String> {
        (**self).clean_tags()
    }
}

/// Normalizes query tags and keeps those present in `known`, in query order,
/// without duplicates.
pub fn validate_tags<S: AsRef<str>>(query: &[S], known: &[String]) -> Vec<String> {
    let mut valid: Vec<String> = Vec::new();
    for raw in query {
        let raw = raw.as_ref();
        match normalize_tag(raw) {
            Some(tag) if known.contains(&tag) => {
                if !valid.contains(&tag) {
                    valid.push(tag);
                }
            }
            _ => debug!("Dropping unknown query tag \"{}\"", raw),
        }
    }
    valid
}

/// Items whose tags include every normalized query tag. A query that normalizes
/// to nothing (only blanks or structural tags) matches everything.
pub fn filter_by_tags<'a, T: Tagged, S: AsRef<str>>(items: &'a [T], query: &[S]) -> Vec<&'a T> {
    let query = clean_tags(query);
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            let tags = item.clean_tags();
            query.iter().all(|q| tags.contains(q))
        })
        .collect()
}

/// Sorted union of the items' normalized tags.
pub fn tags_in_items<T: Tagged>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .flat_map(Tagged::clean_tags)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagState {
    Active,
    Inactive,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagFacet {
    pub tag: String,
    pub label: String,
    pub state: TagState,
}

/// One facet per known tag, in `known` order.
pub fn facets(known: &[String], selected: &[String], in_results: &[String]) -> Vec<TagFacet> {
    known
        .iter()
        .map(|tag| {
            let state = if selected.contains(tag) {
                TagState::Active
            } else if in_results.contains(tag) {
                TagState::Inactive
            } else {
                TagState::Unavailable
            };
            TagFacet {
                tag: tag.clone(),
                label: display_tag(tag),
                state,
            }
        })
        .collect()
}
