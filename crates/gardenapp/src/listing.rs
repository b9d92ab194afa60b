//! # Notes Listing
//!
//! The notes page is a flat, filterable list. Each entry becomes a
//! [`NotesListItem`] carrying only what the page needs: a link, an icon, the link
//! text and the normalized tags used for filtering.
//!
//! The HTML helpers produce fragments the page swaps in without a client-side
//! framework. All entry-derived text is escaped.

use reqwest::Url;
use serde::Serialize;

use crate::model::{Entry, EntryKind};
use crate::query::{TagFacet, TagState, Tagged};
use crate::tags::clean_tags;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotesListItem {
    pub href: String,
    pub icon_html: String,
    pub text: String,
    pub tags: Vec<String>,
}

impl Tagged for NotesListItem {
    fn clean_tags(&self) -> Vec<String> {
        self.tags.clone()
    }
}

pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

const DRAFT_EMOJI: &str = "✍️";
const NOTE_EMOJI: &str = "📝";
const BOOK_EMOJI: &str = "📖";

fn emoji_description(emoji: &str) -> &'static str {
    match emoji {
        "📺" => "television",
        "🧰" => "toolbox",
        "💬" => "speech balloon",
        "📖" => "open book",
        "✍️" => "writing hand",
        "📝" => "memo",
        _ => "",
    }
}

fn emoji_html(emoji: &str) -> String {
    format!(
        "<span role=\"img\" aria-label=\"{}\">{}</span>",
        emoji_description(emoji),
        emoji
    )
}

fn emoji_for_source(source: &str) -> &'static str {
    let host = Url::parse(source)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.trim_start_matches("www.").to_string()));

    match host.as_deref() {
        Some("github.com") => "🧰",
        Some("reddit.com") | Some("stackoverflow.com") => "💬",
        Some("youtube.com") => "📺",
        _ => BOOK_EMOJI,
    }
}

/// Icon markup for an entry: a favicon or host emoji for bookmarks, a writing hand
/// for drafts, a memo for everything else.
pub fn icon_html(entry: &Entry) -> String {
    match &entry.kind {
        EntryKind::Draft => emoji_html(DRAFT_EMOJI),
        EntryKind::Bookmark(bookmark) => match bookmark.favicon.as_deref().filter(|f| !f.is_empty()) {
            Some(favicon) => format!(
                "<img src=\"{}\" alt=\"\" width=\"20\" class=\"inline-block\" />",
                escape_html(favicon)
            ),
            None => emoji_html(emoji_for_source(&bookmark.source)),
        },
        _ => emoji_html(NOTE_EMOJI),
    }
}

/// Title (or id), followed by the bookmark's authors in parentheses.
pub fn link_text(entry: &Entry) -> String {
    let title = entry.title_or_id();
    match &entry.kind {
        EntryKind::Bookmark(bookmark) if !bookmark.author.is_empty() => {
            format!("{} ({})", title, bookmark.author.join(", "))
        }
        _ => title.to_string(),
    }
}

impl From<&Entry> for NotesListItem {
    fn from(entry: &Entry) -> Self {
        Self {
            href: entry.href(),
            icon_html: icon_html(entry),
            text: link_text(entry),
            tags: clean_tags(&entry.base.tags),
        }
    }
}

pub fn list_items<'a, I>(entries: I) -> Vec<NotesListItem>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().map(NotesListItem::from).collect()
}

/// `<li>` fragments separated by bullets.
pub fn list_items_html(items: &[&NotesListItem]) -> String {
    let last = items.len().saturating_sub(1);
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let separator = if index < last {
                "<span class=\"separator\">•</span>"
            } else {
                ""
            };
            format!(
                "<li class=\"inline\"><span class=\"whitespace-nowrap\"><span class=\"inline mr-1\">{}</span><a href=\"{}\" class=\"inline link-nav\">{}</a></span>{}</li>",
                item.icon_html,
                escape_html(&item.href),
                escape_html(&item.text),
                separator
            )
        })
        .collect()
}

/// One `<button>` per facet; unavailable tags are disabled.
pub fn tag_cloud_html(facets: &[TagFacet]) -> String {
    facets
        .iter()
        .map(|facet| {
            let (state, disabled) = match facet.state {
                TagState::Active => ("active", ""),
                TagState::Inactive => ("inactive", ""),
                TagState::Unavailable => ("unavailable", " disabled"),
            };
            format!(
                "<button data-tag-button data-tag-value=\"{}\" data-state=\"{}\"{}>{}</button>",
                escape_html(&facet.tag),
                state,
                disabled,
                escape_html(&facet.label)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::into_entry;
    use crate::model::{Collection, Frontmatter, RawEntry};

    fn bookmark(source: &str, favicon: Option<&str>, author: Option<Vec<&str>>) -> Entry {
        let fm = Frontmatter {
            title: Some("A <b>link</b>".into()),
            source: Some(source.into()),
            captured: Some("2024-01-01".into()),
            favicon: favicon.map(str::to_string),
            author: author.map(|a| a.into_iter().map(str::to_string).collect()),
            tags: Some(vec![Some("topic/Rust".into())]),
            ..Default::default()
        };
        into_entry(RawEntry::new(Collection::Bookmarks, "links/a", fm)).unwrap()
    }

    #[test]
    fn test_bookmark_icons_by_host() {
        assert!(icon_html(&bookmark("https://github.com/rust-lang", None, None)).contains("🧰"));
        assert!(icon_html(&bookmark("https://www.youtube.com/watch?v=1", None, None)).contains("📺"));
        assert!(icon_html(&bookmark("https://stackoverflow.com/q/1", None, None)).contains("💬"));
        assert!(icon_html(&bookmark("https://blog.example.com", None, None)).contains("📖"));
        assert!(icon_html(&bookmark("not a url", None, None)).contains("📖"));
    }

    #[test]
    fn test_favicon_wins() {
        let html = icon_html(&bookmark("https://github.com", Some("https://x.test/f.ico"), None));
        assert!(html.starts_with("<img src=\"https://x.test/f.ico\""));
    }

    #[test]
    fn test_draft_and_note_icons() {
        let draft = into_entry(RawEntry::new(Collection::Drafts, "d", Frontmatter::default())).unwrap();
        let note = into_entry(RawEntry::new(Collection::Writing, "n", Frontmatter::default())).unwrap();
        assert!(icon_html(&draft).contains("writing hand"));
        assert!(icon_html(&note).contains("memo"));
    }

    #[test]
    fn test_list_item_from_entry() {
        let item = NotesListItem::from(&bookmark("https://x.test", None, Some(vec!["Ann", "Bo"])));
        assert_eq!(item.href, "/links/a/");
        assert_eq!(item.text, "A <b>link</b> (Ann, Bo)");
        assert_eq!(item.tags, vec!["rust"]);
    }

    #[test]
    fn test_list_html_escapes_text() {
        let item = NotesListItem::from(&bookmark("https://x.test", None, None));
        let html = list_items_html(&[&item, &item]);
        assert!(html.contains("A &lt;b&gt;link&lt;/b&gt;"));
        assert_eq!(html.matches("separator").count(), 1);
    }

    #[test]
    fn test_tag_cloud_disables_unavailable() {
        let facets = vec![
            TagFacet {
                tag: "a".into(),
                label: "a".into(),
                state: TagState::Active,
            },
            TagFacet {
                tag: "b-c".into(),
                label: "b c".into(),
                state: TagState::Unavailable,
            },
        ];
        let html = tag_cloud_html(&facets);
        assert!(html.contains("data-tag-value=\"a\" data-state=\"active\">a</button>"));
        assert!(html.contains("data-state=\"unavailable\" disabled>b c</button>"));
    }
}
