//! Image handling: YouTube embeds, CDN image attributes and unwrapping
//! image-only paragraphs.

use log::warn;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

use crate::cdn::{ImageCatalog, Resource, DEFAULT_WIDTH, SIZES};
use crate::listing::escape_html;

/// An image span: its `Start(Image)` fields and the alt text inside it.
struct ImageSpan<'a> {
    link_type: LinkType,
    dest_url: CowStr<'a>,
    title: CowStr<'a>,
    id: CowStr<'a>,
    inner: Vec<Event<'a>>,
}

impl<'a> ImageSpan<'a> {
    fn alt(&self) -> String {
        self.inner
            .iter()
            .filter_map(|e| match e {
                Event::Text(t) | Event::Code(t) => Some(t.as_ref()),
                _ => None,
            })
            .collect()
    }

    fn into_events(self) -> Vec<Event<'a>> {
        let mut events = Vec::with_capacity(self.inner.len() + 2);
        events.push(Event::Start(Tag::Image {
            link_type: self.link_type,
            dest_url: self.dest_url,
            title: self.title,
            id: self.id,
        }));
        events.extend(self.inner);
        events.push(Event::End(TagEnd::Image));
        events
    }
}

/// Walks the events and hands every image span to `f`, splicing in what it
/// returns.
fn map_images<'a, F>(events: Vec<Event<'a>>, mut f: F) -> Vec<Event<'a>>
where
    F: FnMut(ImageSpan<'a>) -> Vec<Event<'a>>,
{
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter();
    while let Some(event) = iter.next() {
        let Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) = event
        else {
            out.push(event);
            continue;
        };

        let mut inner = Vec::new();
        let mut depth = 0usize;
        for next in iter.by_ref() {
            match &next {
                Event::Start(Tag::Image { .. }) => depth += 1,
                Event::End(TagEnd::Image) if depth == 0 => break,
                Event::End(TagEnd::Image) => depth -= 1,
                _ => {}
            }
            inner.push(next);
        }

        out.extend(f(ImageSpan {
            link_type,
            dest_url,
            title,
            id,
            inner,
        }));
    }
    out
}

/// Video id of a YouTube watch URL (`...watch?v=<id>&...`).
pub fn youtube_video_id(url: &str) -> Option<&str> {
    if !url.contains("youtube.com") {
        return None;
    }
    let (_, after) = url.split_once("v=")?;
    let id = after.split(['&', '#']).next().unwrap_or(after);
    (!id.is_empty()).then_some(id)
}

pub fn youtube_iframe(video_id: &str) -> String {
    format!(
        "<iframe width=\"560\" height=\"315\" src=\"https://www.youtube.com/embed/{}\" title=\"YouTube video player\" frameborder=\"0\" allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share\" referrerpolicy=\"strict-origin-when-cross-origin\" allowfullscreen></iframe>",
        escape_html(video_id)
    )
}

/// Replaces YouTube image links with an embedded player, or with a plain link
/// to the video when raw HTML is not allowed.
pub fn embed_youtube(events: Vec<Event<'_>>, allow_html: bool) -> Vec<Event<'_>> {
    map_images(events, |span| {
        let Some(video_id) = youtube_video_id(&span.dest_url) else {
            return span.into_events();
        };
        if allow_html {
            return vec![Event::InlineHtml(CowStr::from(youtube_iframe(video_id)))];
        }

        let mut link = vec![Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: span.dest_url.clone(),
            title: span.title.clone(),
            id: CowStr::from(""),
        })];
        if span.inner.is_empty() {
            link.push(Event::Text(span.dest_url.clone()));
        } else {
            link.extend(span.inner);
        }
        link.push(Event::End(TagEnd::Link));
        link
    })
}

fn img_html(catalog: &ImageCatalog, resource: &Resource, alt: &str) -> String {
    let mut html = format!(
        "<img src=\"{}\" srcset=\"{}\" sizes=\"{}\" alt=\"{}\"",
        catalog.url(resource, DEFAULT_WIDTH),
        catalog.srcset(resource),
        SIZES,
        escape_html(alt)
    );
    if let Some(width) = resource.width {
        html.push_str(&format!(" width=\"{}\"", width));
    }
    if let Some(height) = resource.height {
        html.push_str(&format!(" height=\"{}\"", height));
    }
    html.push_str(" loading=\"lazy\" decoding=\"async\" />");
    html
}

/// Full markup for a CDN image, wrapped in a `<figure>` when it has a caption.
pub fn cdn_image_html(catalog: &ImageCatalog, resource: &Resource, fallback_alt: &str) -> String {
    let alt = resource.alt().unwrap_or(fallback_alt);
    let img = img_html(catalog, resource, alt);
    match resource.caption() {
        Some(caption) => format!(
            "<figure>{}<figcaption>{}</figcaption></figure>",
            img,
            escape_html(caption)
        ),
        None => img,
    }
}

/// Swaps CDN images for responsive markup. With `allow_html` off, only the image
/// URL is rewritten to an optimized one.
pub fn cdn_images<'a>(events: Vec<Event<'a>>, catalog: &ImageCatalog, allow_html: bool) -> Vec<Event<'a>> {
    map_images(events, |mut span| {
        if !catalog.is_cdn_image(&span.dest_url) {
            return span.into_events();
        }
        let Some(resource) = catalog.find(&span.dest_url) else {
            warn!("Image {} is not in the CDN snapshot", span.dest_url);
            return span.into_events();
        };

        if allow_html {
            let alt = span.alt();
            return vec![Event::InlineHtml(CowStr::from(cdn_image_html(catalog, resource, &alt)))];
        }
        span.dest_url = CowStr::from(catalog.url(resource, DEFAULT_WIDTH));
        span.into_events()
    })
}

fn is_blank(event: &Event) -> bool {
    match event {
        Event::Text(t) => t.trim().is_empty(),
        Event::SoftBreak | Event::HardBreak => true,
        _ => false,
    }
}

/// Drops the `<p>` around paragraphs that hold nothing but images, so figures
/// are not nested in paragraphs.
pub fn unwrap_images(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter();
    while let Some(event) = iter.next() {
        if !matches!(event, Event::Start(Tag::Paragraph)) {
            out.push(event);
            continue;
        }

        let mut body = Vec::new();
        for next in iter.by_ref() {
            if matches!(next, Event::End(TagEnd::Paragraph)) {
                break;
            }
            body.push(next);
        }

        let mut image_depth = 0usize;
        let mut images = 0usize;
        let mut only_images = true;
        for e in &body {
            match e {
                Event::Start(Tag::Image { .. }) => {
                    if image_depth == 0 {
                        images += 1;
                    }
                    image_depth += 1;
                }
                Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
                e if image_depth == 0 && !is_blank(e) => only_images = false,
                _ => {}
            }
        }

        if only_images && images > 0 {
            let mut depth = 0usize;
            for e in body {
                let inside = depth > 0;
                match &e {
                    Event::Start(Tag::Image { .. }) => depth += 1,
                    Event::End(TagEnd::Image) => depth = depth.saturating_sub(1),
                    _ => {}
                }
                let is_image_event = matches!(&e, Event::Start(Tag::Image { .. }) | Event::End(TagEnd::Image));
                if inside || is_image_event {
                    out.push(e);
                }
            }
        } else {
            out.push(Event::Start(Tag::Paragraph));
            out.extend(body);
            out.push(Event::End(TagEnd::Paragraph));
        }
    }
    out
}
