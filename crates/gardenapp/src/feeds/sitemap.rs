//! Sitemap over the static pages, the posts and every note in the forest.

use std::collections::HashSet;

use super::{absolute_url, escape_xml, XML_DECLARATION};
use crate::model::Entry;
use crate::tree::{flatten, Node};

/// Every path in `/<slug>/` form, in page, post, note order, without repeats.
pub fn sitemap_paths(static_pages: &[String], posts: &[&Entry], notes: &[Node]) -> Vec<String> {
    let mut seen = HashSet::new();
    static_pages
        .iter()
        .cloned()
        .chain(posts.iter().map(|p| p.href()))
        .chain(flatten(notes).into_iter().map(Entry::href))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

pub fn render_sitemap(base_url: &str, paths: &[String]) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">");
    for path in paths {
        out.push_str(&format!(
            "<url><loc>{}</loc></url>",
            escape_xml(&absolute_url(base_url, path))
        ));
    }
    out.push_str("</urlset>");
    out
}
