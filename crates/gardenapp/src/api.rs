//! # API Facade
//!
//! The API layer is a **thin facade** over the pipeline modules. Every client (the
//! `garden` CLI, a dev server, tests) goes through it.
//!
//! ## Sites and Builds
//!
//! [`SiteApi`] owns the long-lived pieces: the content store, the last-modified
//! provider and the [`SiteConfig`]. It is generic over both traits:
//!
//! - Production: `SiteApi<FileStore, GitLastModified>`
//! - Testing: `SiteApi<InMemoryStore, NoLastModified>`
//!
//! [`SiteApi::build`] starts a [`Build`]: one [`Aggregation`] with one clock and
//! one build mode. Everything a build derives is memoized inside it, so a page
//! renderer, the feeds and the notes filter share a single load. Starting another
//! build reloads the content.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that lives in `collections`, `query`, `feeds` and friends
//! - **I/O to the terminal**: no stdout, no stderr, no exit codes
//! - **Presentation**: returns data structures (and the HTML/XML the site serves),
//!   never terminal formatting

use chrono::{DateTime, Utc};
use log::warn;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::aggregate::Aggregation;
use crate::audit::{audit_posts, Audit};
use crate::cdn::client::{cache_resources, AdminApi};
use crate::cdn::snapshot::read_snapshot;
use crate::cdn::ImageCatalog;
use crate::classify::PrivacyPolicy;
use crate::collections;
use crate::config::SiteConfig;
use crate::error::{GardenError, Result};
use crate::feeds::rss::{feed_items, render_rss, Channel};
use crate::feeds::sitemap::{render_sitemap, sitemap_paths};
use crate::lastmod::LastModifiedProvider;
use crate::likes::{fetch_likes, load_list, ItunesLookup, Like, Medium};
use crate::listing::{list_items, NotesListItem};
use crate::markdown::backlinks::{backlink_index, link_slug};
use crate::markdown::{Renderer, Target};
use crate::model::{Entry, Kind};
use crate::query::{facets, filter_by_tags, tags_in_items, validate_tags, TagFacet};
use crate::store::ContentStore;
use crate::tree::{flatten, Node};

pub struct SiteApi<S: ContentStore, L: LastModifiedProvider> {
    store: S,
    last_modified: L,
    config: SiteConfig,
    now: Option<DateTime<Utc>>,
}

impl<S: ContentStore, L: LastModifiedProvider> SiteApi<S, L> {
    pub fn new(store: S, last_modified: L, config: SiteConfig) -> Self {
        Self {
            store,
            last_modified,
            config,
            now: None,
        }
    }

    /// Pins the clock of every build started from this API.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn build(&self) -> Build<'_> {
        let policy = PrivacyPolicy::new(self.config.private_namespaces.iter().cloned());
        let mut aggregation = Aggregation::new(&self.store, &self.last_modified, self.config.mode, policy);
        if let Some(now) = self.now {
            aggregation = aggregation.at(now);
        }
        Build {
            aggregation,
            config: &self.config,
            notes_items: OnceCell::new(),
            backlinks: OnceCell::new(),
        }
    }

    /// The CDN snapshot as an image catalog. `None` when no CDN is configured or
    /// no snapshot has been cached yet.
    pub fn image_catalog(&self) -> Result<Option<ImageCatalog>> {
        let Some(cloud_name) = self.config.cdn_cloud_name.as_deref() else {
            return Ok(None);
        };
        match read_snapshot(&self.config.cdn_cache_dir, &self.config.cdn_folder) {
            Ok(resources) => Ok(Some(ImageCatalog::new(cloud_name, &self.config.cdn_folder, resources))),
            Err(GardenError::SnapshotMissing(path)) => {
                warn!("No CDN snapshot at {}; images render unoptimized", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Refreshes the CDN snapshot of the configured asset folder.
    pub fn cache_images<A: AdminApi + ?Sized>(&self, api: &A, taken_at: DateTime<Utc>) -> Result<PathBuf> {
        cache_resources(api, &self.config.cdn_folder, &self.config.cdn_cache_dir, taken_at)
    }

    /// Likes of every medium, each newest first.
    pub fn likes<I: ItunesLookup + ?Sized>(&self, lookup: &I) -> Result<Vec<(Medium, Vec<Like>)>> {
        let cloud_name = self.config.cdn_cloud_name.as_deref();
        Medium::all()
            .iter()
            .map(|&medium| {
                let list = load_list(&self.config.itunes_dir, medium)?;
                Ok((medium, fetch_likes(lookup, &list, medium, cloud_name)))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub mode: String,
    pub items: usize,
    pub tags: usize,
    pub notes: usize,
    pub note_roots: usize,
    pub posts: usize,
    pub published_posts: usize,
    pub scheduled_posts: usize,
    pub drafts: usize,
    pub tils: usize,
    pub bookmarks: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub filtered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterTags {
    pub all: Vec<String>,
    pub filtered: Vec<String>,
    /// The query exactly as received.
    pub query: Vec<String>,
    pub valid: Vec<String>,
}

/// Response of the notes filter endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredNotes {
    pub count: FilterCounts,
    pub results: Vec<NotesListItem>,
    pub tags: FilterTags,
    pub facets: Vec<TagFacet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub backlinks: Vec<String>,
}

/// One build of the site.
pub struct Build<'a> {
    aggregation: Aggregation<'a>,
    config: &'a SiteConfig,
    notes_items: OnceCell<Vec<NotesListItem>>,
    backlinks: OnceCell<BTreeMap<String, Vec<String>>>,
}

impl<'a> Build<'a> {
    pub fn aggregation(&self) -> &Aggregation<'a> {
        &self.aggregation
    }

    pub fn summary(&self) -> Result<BuildSummary> {
        let agg = &self.aggregation;
        Ok(BuildSummary {
            mode: agg.mode().to_string(),
            items: agg.items()?.len(),
            tags: agg.tags()?.len(),
            notes: agg.notes()?.iter().map(Node::size).sum(),
            note_roots: agg.notes()?.len(),
            posts: collections::posts(agg)?.len(),
            published_posts: collections::published_posts(agg)?.len(),
            scheduled_posts: collections::scheduled_posts(agg)?.len(),
            drafts: collections::drafts(agg)?.len(),
            tils: collections::tils(agg)?.len(),
            bookmarks: collections::bookmarks(agg)?.len(),
            pages: collections::pages(agg)?.len(),
        })
    }

    /// Entries of one kind through its collection view, or every item.
    pub fn list(&self, kind: Option<Kind>) -> Result<Vec<&Entry>> {
        let agg = &self.aggregation;
        match kind {
            None => Ok(agg.items()?.iter().collect()),
            Some(Kind::Post) => collections::posts(agg),
            Some(Kind::Draft) => collections::drafts(agg),
            Some(Kind::Note) => Ok(flatten(agg.notes()?)),
            Some(Kind::Bookmark) => collections::bookmarks(agg),
            Some(Kind::Til) => collections::tils(agg),
            Some(Kind::Page) => collections::pages(agg),
        }
    }

    pub fn tags(&self) -> Result<&[String]> {
        self.aggregation.tags()
    }

    pub fn notes(&self) -> Result<&[Node]> {
        self.aggregation.notes()
    }

    pub fn entry(&self, id: &str) -> Result<&Entry> {
        self.aggregation.find(id)
    }

    /// The notes page as list items, built once per build.
    pub fn notes_items(&self) -> Result<&[NotesListItem]> {
        self.notes_items
            .get_or_try_init(|| Ok(list_items(collections::notes_page(&self.aggregation)?)))
            .map(Vec::as_slice)
    }

    /// Linked-to slug to the ids of the entries linking to it, built once per build.
    pub fn backlinks(&self) -> Result<&BTreeMap<String, Vec<String>>> {
        self.backlinks
            .get_or_try_init(|| Ok(backlink_index(self.aggregation.items()?)))
    }

    /// Filters the notes page by tags. Unknown query tags are ignored.
    pub fn filter_notes<Q: AsRef<str>>(&self, query: &[Q]) -> Result<FilteredNotes> {
        let all_items = self.notes_items()?;
        let all_tags = tags_in_items(all_items);
        let valid = validate_tags(query, &all_tags);
        let filtered = filter_by_tags(all_items, &valid);
        let filtered_tags = tags_in_items(&filtered);

        Ok(FilteredNotes {
            count: FilterCounts {
                all: all_items.len(),
                filtered: filtered.len(),
            },
            facets: facets(&all_tags, &valid, &filtered_tags),
            results: filtered.into_iter().cloned().collect(),
            tags: FilterTags {
                all: all_tags,
                filtered: filtered_tags,
                query: query.iter().map(|q| q.as_ref().to_string()).collect(),
                valid,
            },
        })
    }

    /// Renders one entry's body, with the ids of the entries linking to it.
    pub fn render(&self, id: &str, target: Target, images: Option<&ImageCatalog>) -> Result<RenderedEntry> {
        let entry = self.entry(id)?;
        let renderer = match images {
            Some(catalog) => Renderer::new().with_images(catalog),
            None => Renderer::new(),
        };
        Ok(RenderedEntry {
            id: entry.id().to_string(),
            title: entry.title_or_id().to_string(),
            content: renderer.render(&entry.base.body, target)?,
            backlinks: self
                .backlinks()?
                .get(&link_slug(entry))
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// RSS of the published posts.
    pub fn rss(&self, images: Option<&ImageCatalog>) -> Result<String> {
        let renderer = match images {
            Some(catalog) => Renderer::new().with_images(catalog),
            None => Renderer::new(),
        };
        let posts = collections::published_posts(&self.aggregation)?;
        let items = feed_items(&posts, self.config.base_url(), &renderer);
        Ok(render_rss(&Channel::from_config(self.config), &items))
    }

    pub fn sitemap(&self) -> Result<String> {
        let posts = collections::posts(&self.aggregation)?;
        let paths = sitemap_paths(&self.config.static_pages, &posts, self.aggregation.notes()?);
        Ok(render_sitemap(self.config.base_url(), &paths))
    }

    pub fn audit(&self) -> Result<Audit> {
        let posts = self.aggregation.of_kind(Kind::Post)?;
        Ok(audit_posts(&posts, self.aggregation.now()))
    }
}
