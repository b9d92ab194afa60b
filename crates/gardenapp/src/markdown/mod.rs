//! # Markdown Pipeline
//!
//! Entry bodies are rendered by parsing them with pulldown-cmark and running the
//! event stream through a fixed series of transforms before serializing it:
//!
//! ```text
//! parse -> coalesce text -> [unwrap image paragraphs] -> remove topic tags
//!       -> wiki links -> YouTube -> CDN images -> [drop raw HTML] -> output
//! ```
//!
//! The same pipeline serves three [`Target`]s:
//!
//! - [`Target::Html`]: page HTML. YouTube links become embedded players and CDN
//!   images become responsive `<img>`/`<figure>` markup.
//! - [`Target::Feed`]: HTML safe to put in a feed. No raw HTML survives, YouTube
//!   links stay links and CDN images only get an optimized `src`.
//! - [`Target::Markdown`]: markdown again (via `pulldown-cmark-to-cmark`), with
//!   wiki links resolved and CDN URLs optimized.
//!
//! CDN images are only rewritten when the renderer has an [`ImageCatalog`].

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use pulldown_cmark_to_cmark::cmark;

use crate::cdn::ImageCatalog;
use crate::error::{GardenError, Result};

pub mod backlinks;
pub mod media;
pub mod text;

use media::{cdn_images, embed_youtube, unwrap_images};
use text::{coalesce_text, expand_wiki_links, map_prose, remove_topic_tags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Html,
    Feed,
    Markdown,
}

impl Target {
    fn allows_html(self) -> bool {
        matches!(self, Target::Html)
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

fn drop_raw_html(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    events
        .into_iter()
        .filter(|e| {
            !matches!(
                e,
                Event::Html(_)
                    | Event::InlineHtml(_)
                    | Event::Start(Tag::HtmlBlock)
                    | Event::End(TagEnd::HtmlBlock)
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer<'a> {
    images: Option<&'a ImageCatalog>,
}

impl<'a> Renderer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves CDN images against `catalog`.
    pub fn with_images(mut self, catalog: &'a ImageCatalog) -> Self {
        self.images = Some(catalog);
        self
    }

    /// Transformed event stream of `body` for `target`.
    pub fn events<'b>(&self, body: &'b str, target: Target) -> Vec<Event<'b>> {
        let mut events = coalesce_text(Parser::new_ext(body, parser_options()).collect());

        if target == Target::Html {
            events = unwrap_images(events);
        }
        events = map_prose(events, |text| {
            vec![Event::Text(CowStr::from(remove_topic_tags(&text)))]
        });
        events = map_prose(events, expand_wiki_links);
        events = embed_youtube(events, target.allows_html());
        if let Some(catalog) = self.images {
            events = cdn_images(events, catalog, target.allows_html());
        }
        if target == Target::Feed {
            events = drop_raw_html(events);
        }
        events
    }

    pub fn html(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, self.events(body, Target::Html).into_iter());
        out
    }

    /// HTML for feed readers, with raw HTML removed.
    pub fn feed_html(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, self.events(body, Target::Feed).into_iter());
        out
    }

    pub fn markdown(&self, body: &str) -> Result<String> {
        let events = self.events(body, Target::Markdown);
        let mut out = String::with_capacity(body.len());
        cmark(events.iter(), &mut out).map_err(|e| GardenError::Markdown(e.to_string()))?;
        Ok(out)
    }

    pub fn render(&self, body: &str, target: Target) -> Result<String> {
        match target {
            Target::Html => Ok(self.html(body)),
            Target::Feed => Ok(self.feed_html(body)),
            Target::Markdown => self.markdown(body),
        }
    }
}
