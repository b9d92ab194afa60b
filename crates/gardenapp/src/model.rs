//! # Domain Model: Entries, Kinds and Frontmatter
//!
//! This module defines the core data structures for garden: [`RawEntry`], [`Entry`],
//! [`EntryKind`] and [`Collection`].
//!
//! ## Two Shapes of an Entry
//!
//! Content arrives from a [`crate::store::ContentStore`] as a [`RawEntry`]: the source
//! collection, a stable id, the untyped [`Frontmatter`] bag and the markdown body.
//! The frontmatter is the union of every collection schema, so any field may be absent.
//!
//! The classifier ([`crate::classify`]) turns each raw entry into an [`Entry`]:
//!
//! ```text
//! Entry
//! ├── base: EntryBase     <-- id, title, date, last_modified, tags, private, body
//! └── kind: EntryKind     <-- one variant per kind, carrying only its own fields
//!     ├── Post { description, feed_id, status, priority }
//!     ├── Draft
//!     ├── Note { parent }
//!     ├── Bookmark { source, captured, author, favicon, image, description }
//!     ├── Til
//!     └── Page
//! ```
//!
//! Only notes can point at a parent, so `parent` lives on the `Note` variant and
//! nowhere else. Code that needs to branch on kind matches on [`EntryKind`]
//! exhaustively instead of probing for fields.
//!
//! ## Dates
//!
//! Frontmatter dates are written by hand, so [`parse_date`] accepts RFC 3339,
//! `YYYY-MM-DD` and `YYYY-MM-DD HH:MM[:SS]`. Date-only values are midnight UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A content collection on disk (one directory under the content root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Writing,
    Drafts,
    Bookmarks,
    Til,
    Pages,
}

impl Collection {
    pub fn all() -> &'static [Collection] {
        &[
            Collection::Writing,
            Collection::Drafts,
            Collection::Bookmarks,
            Collection::Til,
            Collection::Pages,
        ]
    }

    /// Directory name of the collection under the content root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Writing => "writing",
            Collection::Drafts => "drafts",
            Collection::Bookmarks => "bookmarks",
            Collection::Til => "til",
            Collection::Pages => "pages",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The semantic category of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Post,
    Draft,
    Note,
    Bookmark,
    Til,
    Page,
}

impl Kind {
    pub fn all() -> &'static [Kind] {
        &[
            Kind::Post,
            Kind::Draft,
            Kind::Note,
            Kind::Bookmark,
            Kind::Til,
            Kind::Page,
        ]
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Post => "post",
            Kind::Draft => "draft",
            Kind::Note => "note",
            Kind::Bookmark => "bookmark",
            Kind::Til => "til",
            Kind::Page => "page",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "post" | "posts" => Ok(Kind::Post),
            "draft" | "drafts" => Ok(Kind::Draft),
            "note" | "notes" => Ok(Kind::Note),
            "bookmark" | "bookmarks" => Ok(Kind::Bookmark),
            "til" | "tils" => Ok(Kind::Til),
            "page" | "pages" => Ok(Kind::Page),
            other => Err(format!("unknown kind: {}", other)),
        }
    }
}

/// Union of every collection's frontmatter schema. All fields are optional here;
/// required fields are enforced per collection when classifying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub feed_id: Option<String>,
    pub parent: Option<String>,
    pub private: Option<bool>,
    pub tags: Option<Vec<Option<String>>>,
    pub destination: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    // bookmarks
    pub author: Option<Vec<String>>,
    pub captured: Option<String>,
    pub favicon: Option<String>,
    pub image: Option<String>,
    pub source: Option<String>,
    pub slug: Option<String>,
}

impl Frontmatter {
    /// Raw tags with null and blank items removed, in source order.
    pub fn raw_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .flatten()
            .flatten()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Whether any raw tag equals `tag`, ignoring surrounding blanks and ASCII case.
    pub fn has_raw_tag(&self, tag: &str) -> bool {
        self.raw_tags()
            .iter()
            .any(|t| t.trim().eq_ignore_ascii_case(tag))
    }
}

/// An entry as loaded from a content store, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub collection: Collection,
    pub id: String,
    pub path: Option<PathBuf>,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl RawEntry {
    pub fn new(collection: Collection, id: impl Into<String>, frontmatter: Frontmatter) -> Self {
        Self {
            collection,
            id: id.into(),
            path: None,
            frontmatter,
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Fields shared by every kind of entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryBase {
    pub id: String,
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Raw tags as written in the frontmatter. Compare through [`crate::tags::clean_tags`].
    pub tags: Vec<String>,
    pub private: bool,
    #[serde(skip)]
    pub body: String,
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostData {
    pub description: Option<String>,
    pub feed_id: Option<String>,
    /// Editorial status of an unpublished post (`drafting`, `editing`, ...).
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteData {
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkData {
    pub source: String,
    pub captured: DateTime<Utc>,
    pub author: Vec<String>,
    pub favicon: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Kind-specific data. Each variant carries only the fields relevant to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryKind {
    Post(PostData),
    Draft,
    Note(NoteData),
    Bookmark(BookmarkData),
    Til,
    Page,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    #[serde(flatten)]
    pub base: EntryBase,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl Entry {
    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn kind(&self) -> Kind {
        match self.kind {
            EntryKind::Post(_) => Kind::Post,
            EntryKind::Draft => Kind::Draft,
            EntryKind::Note(_) => Kind::Note,
            EntryKind::Bookmark(_) => Kind::Bookmark,
            EntryKind::Til => Kind::Til,
            EntryKind::Page => Kind::Page,
        }
    }

    /// Declared parent id. Only notes have one.
    pub fn parent(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Note(note) => note.parent.as_deref(),
            _ => None,
        }
    }

    /// Title when present, otherwise the id.
    pub fn title_or_id(&self) -> &str {
        self.base
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.base.id)
    }

    /// Site path of the entry, always in `/<id>/` form.
    pub fn href(&self) -> String {
        format!("/{}/", self.base.id.trim_matches('/'))
    }
}

impl AsRef<Entry> for Entry {
    fn as_ref(&self) -> &Entry {
        self
    }
}

/// Parses a hand-written frontmatter date.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
