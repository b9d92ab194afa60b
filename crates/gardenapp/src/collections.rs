//! # Collection Views
//!
//! The views page renderers and feeds ask for. Each one reads an [`Aggregation`],
//! so privacy redaction has already happened; the views add publication rules and
//! ordering on top.
//!
//! | View               | Production                 | Development                  | Order                     |
//! |--------------------|----------------------------|------------------------------|---------------------------|
//! | [`posts`]          | published                  | every post                   | date desc, undated first  |
//! | [`published_posts`]| published                  | published                    | date desc                 |
//! | [`scheduled_posts`]| scheduled                  | scheduled                    | date asc                  |
//! | [`tils`]           | published                  | every TIL                    | date desc                 |
//! | [`drafts`]         | public                     | every draft                  | last modified             |
//! | [`bookmarks`]      | public                     | every bookmark               | last modified             |
//! | [`pages`]          | public                     | every page                   | last modified             |
//!
//! [`notes_page`] mixes scheduled posts, drafts, note roots and bookmarks, ordered
//! by last modified.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::aggregate::{sort_by_last_modified, Aggregation};
use crate::classify::{is_published, is_scheduled};
use crate::error::Result;
use crate::model::{Entry, Kind};
use crate::tree::Node;

/// Newest date first. Undated entries count as `now`, so in development drafts
/// and scheduled posts float to the top. Ties go to title (or id) ascending.
fn compare_by_date(a: &Entry, b: &Entry, now: DateTime<Utc>) -> Ordering {
    let a_date = a.base.date.unwrap_or(now);
    let b_date = b.base.date.unwrap_or(now);
    b_date
        .cmp(&a_date)
        .then_with(|| a.title_or_id().cmp(b.title_or_id()))
}

fn sorted_by_date(mut entries: Vec<&Entry>, now: DateTime<Utc>) -> Vec<&Entry> {
    entries.sort_by(|a, b| compare_by_date(a, b, now));
    entries
}

pub fn posts<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    let now = agg.now();
    let production = agg.mode().is_production();
    let posts = agg
        .of_kind(Kind::Post)?
        .into_iter()
        .filter(|p| !production || is_published(p, now))
        .collect();
    Ok(sorted_by_date(posts, now))
}

pub fn published_posts<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    let now = agg.now();
    let posts = agg
        .of_kind(Kind::Post)?
        .into_iter()
        .filter(|p| is_published(p, now))
        .collect();
    Ok(sorted_by_date(posts, now))
}

/// Posts with a future date, soonest first.
pub fn scheduled_posts<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    let now = agg.now();
    let mut posts: Vec<&Entry> = agg
        .of_kind(Kind::Post)?
        .into_iter()
        .filter(|p| is_scheduled(p, now))
        .collect();
    posts.sort_by_key(|p| p.base.date);
    Ok(posts)
}

pub fn tils<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    let now = agg.now();
    let production = agg.mode().is_production();
    let tils = agg
        .of_kind(Kind::Til)?
        .into_iter()
        .filter(|t| !production || is_published(t, now))
        .collect();
    Ok(sorted_by_date(tils, now))
}

pub fn drafts<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    agg.of_kind(Kind::Draft)
}

pub fn bookmarks<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    agg.of_kind(Kind::Bookmark)
}

pub fn pages<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    agg.of_kind(Kind::Page)
}

/// Everything listed on the notes page. Scheduled posts show up alongside drafts
/// until they go live; notes contribute only their roots.
pub fn notes_page<'a>(agg: &'a Aggregation) -> Result<Vec<&'a Entry>> {
    let mut entries = scheduled_posts(agg)?;
    entries.extend(drafts(agg)?);
    entries.extend(agg.notes()?.iter().map(|node| &node.entry));
    entries.extend(bookmarks(agg)?);
    sort_by_last_modified(&mut entries);
    Ok(entries)
}

fn trim_slashes(s: &str) -> &str {
    s.trim_matches('/')
}

/// True iff `path` names any node in the forest, at any depth. Leading and
/// trailing slashes are ignored.
pub fn is_path_in_collection(path: &str, forest: &[Node]) -> bool {
    let wanted = trim_slashes(path);
    forest.iter().any(|node| {
        trim_slashes(node.entry.id()) == wanted || is_path_in_collection(path, &node.children)
    })
}
