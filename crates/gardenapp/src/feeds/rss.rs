//! RSS 2.0 feed of published posts.
//!
//! Item content is the feed-safe HTML rendering of the post body (no raw HTML,
//! see [`crate::markdown::Target::Feed`]) wrapped in CDATA. A post's `feedId`
//! frontmatter, when set, is used as a non-permalink guid so readers keep
//! recognizing items whose URL changed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{absolute_url, escape_xml, XML_DECLARATION};
use crate::config::SiteConfig;
use crate::markdown::Renderer;
use crate::model::{Entry, EntryKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
}

impl Channel {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.site_title.clone(),
            link: absolute_url(config.base_url(), "/"),
            description: config.site_description.clone(),
            language: config.feed_language.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub guid_is_permalink: bool,
    pub pub_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub content: String,
}

impl FeedItem {
    pub fn from_entry(entry: &Entry, base_url: &str, renderer: &Renderer) -> Self {
        let link = absolute_url(base_url, &entry.href());
        let (feed_id, description) = match &entry.kind {
            EntryKind::Post(post) => (post.feed_id.clone(), post.description.clone()),
            _ => (None, None),
        };
        let feed_id = feed_id.filter(|id| !id.trim().is_empty());

        Self {
            title: entry.title_or_id().to_string(),
            guid: feed_id.clone().unwrap_or_else(|| link.clone()),
            guid_is_permalink: feed_id.is_none(),
            link,
            pub_date: entry.base.date,
            description,
            content: renderer.feed_html(&entry.base.body),
        }
    }
}

pub fn feed_items(entries: &[&Entry], base_url: &str, renderer: &Renderer) -> Vec<FeedItem> {
    entries
        .iter()
        .map(|entry| FeedItem::from_entry(entry, base_url, renderer))
        .collect()
}

fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn element(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!("<{0}>{1}</{0}>", name, escape_xml(value)));
}

pub fn render_rss(channel: &Channel, items: &[FeedItem]) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str("<rss version=\"2.0\" xmlns:content=\"http://purl.org/rss/1.0/modules/content/\"><channel>");
    element(&mut out, "title", &channel.title);
    element(&mut out, "description", &channel.description);
    element(&mut out, "link", &channel.link);
    element(&mut out, "language", &channel.language);

    for item in items {
        out.push_str("<item>");
        element(&mut out, "title", &item.title);
        element(&mut out, "link", &item.link);
        out.push_str(&format!(
            "<guid isPermaLink=\"{}\">{}</guid>",
            item.guid_is_permalink,
            escape_xml(&item.guid)
        ));
        if let Some(date) = item.pub_date {
            element(&mut out, "pubDate", &date.to_rfc2822());
        }
        if let Some(description) = &item.description {
            element(&mut out, "description", description);
        }
        out.push_str("<content:encoded>");
        out.push_str(&cdata(&item.content));
        out.push_str("</content:encoded>");
        out.push_str("</item>");
    }

    out.push_str("</channel></rss>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::into_entry;
    use crate::model::{Collection, Frontmatter, RawEntry};

    fn post(id: &str, feed_id: Option<&str>, body: &str) -> Entry {
        let fm = Frontmatter {
            title: Some(format!("Post <{}>", id)),
            date: Some("2024-05-01".into()),
            feed_id: feed_id.map(str::to_string),
            description: Some("About & more".into()),
            tags: Some(vec![Some("post".into())]),
            ..Default::default()
        };
        into_entry(RawEntry::new(Collection::Writing, id, fm).with_body(body)).unwrap()
    }

    fn channel() -> Channel {
        Channel::from_config(&SiteConfig {
            site_url: "https://garden.test/".into(),
            site_title: "Garden".into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_item_fields() {
        let entry = post("hello", None, "Hi <b>there</b>\n");
        let item = FeedItem::from_entry(&entry, "https://garden.test", &Renderer::new());

        assert_eq!(item.link, "https://garden.test/hello/");
        assert_eq!(item.guid, item.link);
        assert!(item.guid_is_permalink);
        assert_eq!(item.content, "<p>Hi there</p>\n");
    }

    #[test]
    fn test_render_rss() {
        let a = post("a", Some("legacy-guid"), "Body\n");
        let items = feed_items(&[&a], "https://garden.test", &Renderer::new());
        let xml = render_rss(&channel(), &items);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><rss version=\"2.0\""));
        assert!(xml.contains("<link>https://garden.test/</link><language>en-ca</language>"));
        assert!(xml.contains("<title>Post &lt;a&gt;</title>"));
        assert!(xml.contains("<guid isPermaLink=\"false\">legacy-guid</guid>"));
        assert!(xml.contains("<pubDate>Wed, "));
        assert!(xml.contains(" May 2024 00:00:00 +0000</pubDate>"));
        assert!(xml.contains("<description>About &amp; more</description>"));
        assert!(xml.contains("<content:encoded><![CDATA[<p>Body</p>\n]]></content:encoded>"));
        assert!(xml.ends_with("</item></channel></rss>"));
    }

    #[test]
    fn test_cdata_splits_terminator() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }
}
