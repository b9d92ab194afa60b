//! # Entry Classification
//!
//! Turns [`RawEntry`] values into typed [`Entry`] values and answers the
//! publication and visibility questions the rest of the pipeline asks.
//!
//! ## Kinds
//!
//! | Collection  | Condition                                   | Kind       |
//! |-------------|---------------------------------------------|------------|
//! | `writing`   | tagged `post` or `destination: blog`        | `Post`     |
//! | `writing`   | anything else                               | `Note`     |
//! | `drafts`    |                                             | `Draft`    |
//! | `bookmarks` |                                             | `Bookmark` |
//! | `til`       |                                             | `Til`      |
//! | `pages`     |                                             | `Page`     |
//!
//! ## Schemas
//!
//! Each collection has required fields, checked in [`into_entry`]:
//! bookmarks need `title`, `source` and `captured`; TILs need `title` and `date`;
//! pages need `title`. Unparseable dates are frontmatter errors.
//!
//! ## Publication
//!
//! - **Published**: has a date, and the date is not in the future.
//! - **Scheduled**: has a date in the future.
//! - **Unscheduled**: no date at all.
//!
//! All predicates take `now` explicitly so one build sees one consistent clock.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{GardenError, Result};
use crate::model::{
    parse_date, BookmarkData, Collection, Entry, EntryBase, EntryKind, Kind, NoteData, PostData,
    RawEntry,
};
use crate::tags::{clean_tags, PRIVATE_TAG};

/// Publication state of a dated or undated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    Published,
    Scheduled,
    Unscheduled,
}

/// Determines the kind of a raw entry from its collection and frontmatter.
pub fn classify(raw: &RawEntry) -> Kind {
    match raw.collection {
        Collection::Writing => {
            let tagged_post = raw.frontmatter.has_raw_tag("post");
            let blog_bound = raw.frontmatter.destination.as_deref() == Some("blog");
            if tagged_post || blog_bound {
                Kind::Post
            } else {
                Kind::Note
            }
        }
        Collection::Drafts => Kind::Draft,
        Collection::Bookmarks => Kind::Bookmark,
        Collection::Til => Kind::Til,
        Collection::Pages => Kind::Page,
    }
}

fn parse_required_date(raw: &RawEntry, field: &'static str, value: Option<&str>) -> Result<DateTime<Utc>> {
    let value = value.ok_or_else(|| missing(raw, field))?;
    parse_date(value).ok_or_else(|| invalid_date(raw, field, value))
}

fn parse_optional_date(raw: &RawEntry, field: &'static str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_date(v)
            .map(Some)
            .ok_or_else(|| invalid_date(raw, field, v)),
    }
}

fn missing(raw: &RawEntry, field: &'static str) -> GardenError {
    GardenError::MissingField {
        collection: raw.collection.to_string(),
        id: raw.id.clone(),
        field,
    }
}

fn invalid_date(raw: &RawEntry, field: &str, value: &str) -> GardenError {
    GardenError::Frontmatter {
        path: raw
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| raw.id.clone()),
        message: format!("invalid {} '{}'", field, value),
    }
}

fn require_title(raw: &RawEntry) -> Result<String> {
    raw.frontmatter
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| missing(raw, "title"))
}

/// Classifies a raw entry and validates it against its collection schema.
pub fn into_entry(raw: RawEntry) -> Result<Entry> {
    let kind = classify(&raw);
    let fm = &raw.frontmatter;

    let (title, date) = match kind {
        Kind::Til => (
            Some(require_title(&raw)?),
            Some(parse_required_date(&raw, "date", fm.date.as_deref())?),
        ),
        Kind::Page => (Some(require_title(&raw)?), None),
        Kind::Bookmark => (
            Some(require_title(&raw)?),
            parse_optional_date(&raw, "date", fm.date.as_deref())?,
        ),
        _ => (
            fm.title.clone().filter(|t| !t.trim().is_empty()),
            parse_optional_date(&raw, "date", fm.date.as_deref())?,
        ),
    };

    let entry_kind = match kind {
        Kind::Post => EntryKind::Post(PostData {
            description: fm.description.clone(),
            feed_id: fm.feed_id.clone(),
            status: fm.status.clone(),
            priority: fm.priority.clone(),
        }),
        Kind::Note => EntryKind::Note(NoteData {
            parent: fm.parent.clone().filter(|p| !p.trim().is_empty()),
        }),
        Kind::Bookmark => EntryKind::Bookmark(BookmarkData {
            source: fm
                .source
                .clone()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| missing(&raw, "source"))?,
            captured: parse_required_date(&raw, "captured", fm.captured.as_deref())?,
            author: fm.author.clone().unwrap_or_default(),
            favicon: fm.favicon.clone(),
            image: fm.image.clone(),
            description: fm.description.clone(),
        }),
        Kind::Draft => EntryKind::Draft,
        Kind::Til => EntryKind::Til,
        Kind::Page => EntryKind::Page,
    };

    let tags = fm.raw_tags();
    let private = fm.private.unwrap_or(false);

    Ok(Entry {
        base: EntryBase {
            id: raw.id,
            title,
            date,
            last_modified: None,
            tags,
            private,
            body: raw.body,
            source_path: raw.path,
        },
        kind: entry_kind,
    })
}

/// True iff the entry has a date that is not after `now`.
pub fn is_published(entry: &Entry, now: DateTime<Utc>) -> bool {
    entry.base.date.is_some_and(|date| date <= now)
}

/// True iff the entry has a date after `now`.
pub fn is_scheduled(entry: &Entry, now: DateTime<Utc>) -> bool {
    entry.base.date.is_some_and(|date| date > now)
}

pub fn publish_state(entry: &Entry, now: DateTime<Utc>) -> PublishState {
    match entry.base.date {
        None => PublishState::Unscheduled,
        Some(date) if date <= now => PublishState::Published,
        Some(_) => PublishState::Scheduled,
    }
}

/// Decides which entries may appear in a public build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivacyPolicy {
    /// Id prefixes reserved for personal content (e.g. `private/`).
    pub private_namespaces: Vec<String>,
}

impl PrivacyPolicy {
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            private_namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }

    fn in_private_namespace(&self, id: &str) -> bool {
        let id = id.trim_start_matches('/').to_lowercase();
        self.private_namespaces.iter().any(|ns| {
            let ns = ns.trim_matches('/').to_lowercase();
            !ns.is_empty() && (id == ns || id.starts_with(&format!("{}/", ns)))
        })
    }

    /// True iff the entry is not flagged private, not tagged private and not inside
    /// a private namespace.
    pub fn is_public(&self, entry: &Entry) -> bool {
        if entry.base.private {
            return false;
        }
        if clean_tags(&entry.base.tags).iter().any(|t| t == PRIVATE_TAG) {
            return false;
        }
        !self.in_private_namespace(&entry.base.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frontmatter;
    use chrono::Duration;

    fn writing(id: &str, fm: Frontmatter) -> RawEntry {
        RawEntry::new(Collection::Writing, id, fm)
    }

    fn tags(list: &[&str]) -> Option<Vec<Option<String>>> {
        Some(list.iter().map(|t| Some(t.to_string())).collect())
    }

    fn dated(date: Option<DateTime<Utc>>) -> Entry {
        let fm = Frontmatter {
            tags: tags(&["post"]),
            date: date.map(|d| d.to_rfc3339()),
            ..Default::default()
        };
        into_entry(writing("p", fm)).unwrap()
    }

    #[test]
    fn test_writing_tagged_post_is_post() {
        let fm = Frontmatter {
            tags: tags(&["post", "topic/rust"]),
            ..Default::default()
        };
        assert_eq!(classify(&writing("a", fm)), Kind::Post);

        let fm = Frontmatter {
            tags: tags(&[" POST "]),
            ..Default::default()
        };
        assert_eq!(classify(&writing("b", fm)), Kind::Post);
    }

    #[test]
    fn test_writing_with_blog_destination_is_post() {
        let fm = Frontmatter {
            destination: Some("blog".into()),
            ..Default::default()
        };
        assert_eq!(classify(&writing("a", fm)), Kind::Post);
    }

    #[test]
    fn test_other_writing_is_note() {
        assert_eq!(classify(&writing("a", Frontmatter::default())), Kind::Note);
    }

    #[test]
    fn test_collections_map_to_kinds() {
        let fm = Frontmatter::default();
        assert_eq!(classify(&RawEntry::new(Collection::Drafts, "d", fm.clone())), Kind::Draft);
        assert_eq!(classify(&RawEntry::new(Collection::Til, "t", fm.clone())), Kind::Til);
        assert_eq!(classify(&RawEntry::new(Collection::Pages, "p", fm.clone())), Kind::Page);
        assert_eq!(classify(&RawEntry::new(Collection::Bookmarks, "b", fm)), Kind::Bookmark);
    }

    #[test]
    fn test_note_keeps_parent() {
        let fm = Frontmatter {
            parent: Some("a".into()),
            ..Default::default()
        };
        let entry = into_entry(writing("b", fm)).unwrap();
        assert_eq!(entry.parent(), Some("a"));
    }

    #[test]
    fn test_bookmark_requires_source() {
        let fm = Frontmatter {
            title: Some("Link".into()),
            captured: Some("2024-01-01".into()),
            ..Default::default()
        };
        let err = into_entry(RawEntry::new(Collection::Bookmarks, "b", fm)).unwrap_err();
        assert!(matches!(err, GardenError::MissingField { field: "source", .. }));
    }

    #[test]
    fn test_til_requires_date() {
        let fm = Frontmatter {
            title: Some("Learned".into()),
            ..Default::default()
        };
        let err = into_entry(RawEntry::new(Collection::Til, "t", fm)).unwrap_err();
        assert!(matches!(err, GardenError::MissingField { field: "date", .. }));
    }

    #[test]
    fn test_invalid_date_is_frontmatter_error() {
        let fm = Frontmatter {
            date: Some("someday".into()),
            ..Default::default()
        };
        let err = into_entry(writing("n", fm)).unwrap_err();
        assert!(matches!(err, GardenError::Frontmatter { .. }));
    }

    #[test]
    fn test_undated_is_neither_published_nor_scheduled() {
        let now = Utc::now();
        let entry = dated(None);
        assert!(!is_published(&entry, now));
        assert!(!is_scheduled(&entry, now));
        assert_eq!(publish_state(&entry, now), PublishState::Unscheduled);
    }

    #[test]
    fn test_published_and_scheduled_are_exclusive() {
        let now = Utc::now();
        let past = dated(Some(now - Duration::days(1)));
        let future = dated(Some(now + Duration::days(1)));

        assert!(is_published(&past, now) && !is_scheduled(&past, now));
        assert!(is_scheduled(&future, now) && !is_published(&future, now));
    }

    #[test]
    fn test_date_equal_to_now_is_published() {
        let now = Utc::now();
        let entry = dated(Some(now));
        // rfc3339 round trip keeps sub-second precision
        assert!(is_published(&entry, now));
    }

    #[test]
    fn test_is_public_flags() {
        let policy = PrivacyPolicy::new(["private"]);

        let flagged = into_entry(writing(
            "a",
            Frontmatter {
                private: Some(true),
                ..Default::default()
            },
        ))
        .unwrap();
        let tagged = into_entry(writing(
            "b",
            Frontmatter {
                tags: tags(&["Private"]),
                ..Default::default()
            },
        ))
        .unwrap();
        let namespaced = into_entry(writing("private/journal", Frontmatter::default())).unwrap();
        let public = into_entry(writing("privateer", Frontmatter::default())).unwrap();

        assert!(!policy.is_public(&flagged));
        assert!(!policy.is_public(&tagged));
        assert!(!policy.is_public(&namespaced));
        assert!(policy.is_public(&public));
    }
}
