//! Transforms over prose text: inline topic tags and wiki links.
//!
//! pulldown-cmark splits text at every bracket it considers as a link candidate,
//! so `[[note]]` arrives as several `Text` events. [`coalesce_text`] merges them
//! before any pattern matching.
//!
//! Text inside code blocks and image alt text is left untouched.

use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

use crate::slug::github_slug;

static TOPIC_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s#[\w|/]+").expect("valid topic tag regex"));

pub(crate) static WIKI_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[(?P<target>[^|\]]+)(?:\|(?P<text>[^\]]+))?\]\]").expect("valid wiki link regex")
});

/// Merges runs of adjacent `Text` events into one.
pub fn coalesce_text(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        if let (Event::Text(next), Some(Event::Text(prev))) = (&event, out.last_mut()) {
            let mut joined = prev.to_string();
            joined.push_str(next);
            *prev = CowStr::from(joined);
            continue;
        }
        out.push(event);
    }
    out
}

/// Applies `f` to every prose `Text` event, replacing it with the events `f`
/// returns.
pub(crate) fn map_prose<'a, F>(events: Vec<Event<'a>>, mut f: F) -> Vec<Event<'a>>
where
    F: FnMut(CowStr<'a>) -> Vec<Event<'a>>,
{
    let mut verbatim_depth = 0usize;
    let mut out = Vec::with_capacity(events.len());
    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Start(Tag::Image { .. }) => {
                verbatim_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::CodeBlock) | Event::End(TagEnd::Image) => {
                verbatim_depth = verbatim_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Text(text) if verbatim_depth == 0 => out.extend(f(text)),
            other => out.push(other),
        }
    }
    out
}

/// Removes inline topic tags such as ` #question` or ` #topic/rust`.
pub fn remove_topic_tags(text: &str) -> String {
    TOPIC_TAG_RE.replace_all(text, "").into_owned()
}

/// The site path a wiki link target points at.
///
/// Folders are dropped (every page lives at the root), and an optional heading
/// becomes a fragment.
///
/// ```
/// use gardenapp::markdown::text::wiki_href;
///
/// assert_eq!(wiki_href("Garden/My Note#Some Heading"), "/my-note/#some-heading");
/// assert_eq!(wiki_href("plain"), "/plain/");
/// ```
pub fn wiki_href(target: &str) -> String {
    let last = target.rsplit('/').next().unwrap_or(target);
    match last.split_once('#') {
        Some((page, heading)) if !heading.trim().is_empty() => {
            format!("/{}/#{}", github_slug(page), github_slug(heading))
        }
        Some((page, _)) => format!("/{}/", github_slug(page)),
        None => format!("/{}/", github_slug(last)),
    }
}

/// Slug of the page a wiki link target names, ignoring folders and headings.
pub fn wiki_target_slug(target: &str) -> String {
    let last = target.rsplit('/').next().unwrap_or(target);
    let page = last.split('#').next().unwrap_or(last);
    github_slug(page)
}

/// Splits text into plain text and link events for each wiki link it contains.
pub fn expand_wiki_links(text: CowStr<'_>) -> Vec<Event<'_>> {
    if !text.contains("[[") {
        return vec![Event::Text(text)];
    }

    let mut events = Vec::new();
    let mut last = 0;
    for caps in WIKI_LINK_RE.captures_iter(&text) {
        let Some(whole) = caps.get(0) else { continue };
        let target = caps.name("target").map_or("", |m| m.as_str());
        let label = caps.name("text").map_or(target, |m| m.as_str());

        if whole.start() > last {
            events.push(Event::Text(CowStr::from(text[last..whole.start()].to_string())));
        }
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: CowStr::from(wiki_href(target)),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(CowStr::from(label.to_string())));
        events.push(Event::End(TagEnd::Link));
        last = whole.end();
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::Parser;

    fn texts(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Text(t) => Some(t.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_coalesce_joins_bracket_fragments() {
        let events = coalesce_text(Parser::new("see [[my note]] now").collect());
        assert_eq!(texts(&events), vec!["see [[my note]] now"]);
    }

    #[test]
    fn test_remove_topic_tags() {
        assert_eq!(remove_topic_tags("Some idea #question #topic/rust here"), "Some idea here");
        assert_eq!(remove_topic_tags("#start stays"), "#start stays");
    }

    #[test]
    fn test_wiki_links_forms() {
        assert_eq!(wiki_href("slug"), "/slug/");
        assert_eq!(wiki_href("folder/Some Page"), "/some-page/");
        assert_eq!(wiki_href("page#"), "/page/");
        assert_eq!(wiki_target_slug("folder/Some Page#Heading"), "some-page");
    }

    #[test]
    fn test_expand_wiki_links() {
        let events = expand_wiki_links(CowStr::from("a [[One]] b [[dir/two|Second]]."));
        let hrefs: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(hrefs, vec!["/one/", "/two/"]);
        assert_eq!(texts(&events), vec!["a ", "One", " b ", "Second", "."]);
    }

    #[test]
    fn test_map_prose_skips_code_blocks() {
        let events = coalesce_text(Parser::new("```\n[[code]]\n```\n\n[[prose]]").collect());
        let mapped = map_prose(events, expand_wiki_links);
        let links = mapped
            .iter()
            .filter(|e| matches!(e, Event::Start(Tag::Link { .. })))
            .count();
        assert_eq!(links, 1);
    }
}
