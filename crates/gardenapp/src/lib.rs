//! # Garden Architecture
//!
//! Garden is the **build-time content pipeline** of a personal site. It loads
//! markdown entries, classifies them, nests notes into trees, redacts what a
//! public build must not show, and serves the views the site's pages, feeds and
//! notes filter need.
//!
//! It is a library first. The `garden` binary is one client; a site generator or
//! a dev server would be others.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (garden crate)                                         │
//! │  - Parses arguments, sets up logging, prints results        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - SiteApi owns store, clock source and config              │
//! │  - Build = one aggregation, memoized                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pipeline                                                   │
//! │  classify → aggregate → tree / collections / query          │
//! │  markdown, feeds, audit, likes, cdn                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Sources                                                    │
//! │  - ContentStore: FileStore, InMemoryStore                   │
//! │  - LastModifiedProvider: GitLastModified, NoLastModified    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Library code reads content and caches, and talks to the image CDN and the
//! iTunes lookup API when asked to. It never prints and never exits; diagnostics
//! go through the `log` facade and the binary decides where they end up.
//!
//! ## Development vs Production
//!
//! A development build keeps everything so drafts and private notes can be
//! previewed. A production build drops private entries, private subtrees of the
//! note forest and unpublished posts. The mode is fixed for the lifetime of a
//! [`aggregate::Aggregation`].
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`model`]: Entries, kinds, collections and frontmatter
//! - [`classify`]: Kind detection, schema checks, publication and privacy rules
//! - [`tags`]: Tag normalization
//! - [`tree`]: Parent/child nesting of notes
//! - [`aggregate`]: Per-build loading, redaction and memoization
//! - [`collections`]: Sorted, filtered views per kind
//! - [`query`]: Tag filtering and facets
//! - [`listing`]: Notes page list items and their HTML
//! - [`markdown`]: Body rendering, wiki links, embeds and backlinks
//! - [`feeds`]: RSS and sitemap
//! - [`cdn`]: Image CDN URLs, admin API and snapshots
//! - [`likes`]: Albums, books and podcasts from the iTunes lookup API
//! - [`audit`]: Writing pipeline digest
//! - [`store`], [`frontmatter`], [`slug`], [`lastmod`]: Content sources
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod aggregate;
pub mod api;
pub mod audit;
pub mod cdn;
pub mod classify;
pub mod collections;
pub mod config;
pub mod error;
pub mod feeds;
pub mod frontmatter;
pub mod lastmod;
pub mod likes;
pub mod listing;
pub mod markdown;
pub mod model;
pub mod query;
pub mod slug;
pub mod store;
pub mod tags;
pub mod tree;

#[cfg(test)]
pub mod test_utils;
