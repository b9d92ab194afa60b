//! # Feeds
//!
//! XML outputs of a build: the RSS 2.0 feed of published posts ([`rss`]) and the
//! sitemap of every public path ([`sitemap`]). Both are written as plain strings;
//! every value that comes from content goes through [`escape_xml`].

pub mod rss;
pub mod sitemap;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Joins a site path onto the base URL with exactly one slash between them.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
