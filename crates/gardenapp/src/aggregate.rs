//! # Aggregation
//!
//! An [`Aggregation`] is one build's view of the content. It owns the clock, the
//! build mode and the privacy policy for that build, and memoizes everything it
//! derives:
//!
//! ```text
//! store ──load (one thread per collection)──► loaded entries
//!                                               │ sort by last_modified
//!                                               ▼
//!                           notes ──nest──► forest ──redact (production)──► notes()
//!                                               │
//!                  other kinds ──is_public (production)──┐
//!                                               ▼         ▼
//!                                             items() = kept entries, sorted
//!                                               │
//!                                               ▼
//!                                             tags()
//! ```
//!
//! Every collection load must succeed; the first failure is returned and nothing is
//! cached. Once a value is computed it is never invalidated, so a fresh build needs
//! a fresh `Aggregation`.
//!
//! ## Ordering
//!
//! Items are sorted by `last_modified`, newest first, comparing timestamps
//! numerically. Entries without a timestamp sort last. The sort is stable and the
//! load order is fixed (collection order, then file order), so output never depends
//! on which loader thread finished first.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::thread;

use crate::classify::{into_entry, PrivacyPolicy};
use crate::config::BuildMode;
use crate::error::{GardenError, Result};
use crate::lastmod::LastModifiedProvider;
use crate::model::{Collection, Entry, Kind};
use crate::store::ContentStore;
use crate::tags::clean_tags;
use crate::tree::{flatten, nest, redact_tree, Node};

/// Newest first; entries without `last_modified` last.
pub fn compare_last_modified(a: &Entry, b: &Entry) -> Ordering {
    match (a.base.last_modified, b.base.last_modified) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ids that more than one entry claims, compared case-insensitively, each
/// reported once in order of its second appearance.
pub fn duplicate_ids(entries: &[Entry]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    entries
        .iter()
        .map(Entry::id)
        .filter(|id| {
            let key = id.to_lowercase();
            !seen.insert(key.clone()) && reported.insert(key)
        })
        .collect()
}

pub fn sort_by_last_modified<E: AsRef<Entry>>(entries: &mut [E]) {
    entries.sort_by(|a, b| compare_last_modified(a.as_ref(), b.as_ref()));
}

pub struct Aggregation<'a> {
    store: &'a dyn ContentStore,
    last_modified: &'a dyn LastModifiedProvider,
    mode: BuildMode,
    policy: PrivacyPolicy,
    now: DateTime<Utc>,
    loaded: OnceCell<Vec<Entry>>,
    notes: OnceCell<Vec<Node>>,
    items: OnceCell<Vec<Entry>>,
    tags: OnceCell<Vec<String>>,
}

impl<'a> Aggregation<'a> {
    pub fn new(
        store: &'a dyn ContentStore,
        last_modified: &'a dyn LastModifiedProvider,
        mode: BuildMode,
        policy: PrivacyPolicy,
    ) -> Self {
        Self {
            store,
            last_modified,
            mode,
            policy,
            now: Utc::now(),
            loaded: OnceCell::new(),
            notes: OnceCell::new(),
            items: OnceCell::new(),
            tags: OnceCell::new(),
        }
    }

    /// Pins the build clock. Every publication check in this build uses it.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn policy(&self) -> &PrivacyPolicy {
        &self.policy
    }

    /// Whether this build keeps `entry`. Development keeps everything.
    pub fn keeps(&self, entry: &Entry) -> bool {
        !self.mode.is_production() || self.policy.is_public(entry)
    }

    fn load_one(&self, collection: Collection) -> Result<Vec<Entry>> {
        let raw = self.store.load_collection(collection)?;
        let mut entries = Vec::with_capacity(raw.len());
        for raw_entry in raw {
            let mut entry = into_entry(raw_entry)?;
            entry.base.last_modified = entry
                .base
                .source_path
                .as_deref()
                .and_then(|path| self.last_modified.last_modified(path));
            entries.push(entry);
        }
        debug!("Loaded {} entries from {}", entries.len(), collection);
        Ok(entries)
    }

    fn loaded(&self) -> Result<&[Entry]> {
        self.loaded
            .get_or_try_init(|| {
                let results: Vec<Result<Vec<Entry>>> = thread::scope(|scope| {
                    let handles: Vec<_> = Collection::all()
                        .iter()
                        .map(|&collection| (collection, scope.spawn(move || self.load_one(collection))))
                        .collect();

                    handles
                        .into_iter()
                        .map(|(collection, handle)| {
                            handle.join().unwrap_or_else(|_| {
                                Err(GardenError::Source {
                                    collection: collection.to_string(),
                                    message: "loader thread panicked".to_string(),
                                })
                            })
                        })
                        .collect()
                });

                let mut all = Vec::new();
                for result in results {
                    all.extend(result?);
                }
                for id in duplicate_ids(&all) {
                    warn!("Duplicate id \"{}\" across collections; lookups return the newest", id);
                }
                sort_by_last_modified(&mut all);
                Ok(all)
            })
            .map(Vec::as_slice)
    }

    /// Note forest, redacted in production.
    pub fn notes(&self) -> Result<&[Node]> {
        self.notes
            .get_or_try_init(|| {
                let notes: Vec<Entry> = self
                    .loaded()?
                    .iter()
                    .filter(|e| e.kind() == Kind::Note)
                    .cloned()
                    .collect();
                let forest = nest(&notes)?;
                Ok(if self.mode.is_production() {
                    redact_tree(&forest, &|e: &Entry| self.policy.is_public(e))
                } else {
                    forest
                })
            })
            .map(Vec::as_slice)
    }

    /// Every entry this build keeps, newest first.
    pub fn items(&self) -> Result<&[Entry]> {
        self.items
            .get_or_try_init(|| {
                let loaded = self.loaded()?;
                let notes = self.notes()?;

                let mut items: Vec<Entry> = loaded
                    .iter()
                    .filter(|e| e.kind() != Kind::Note && self.keeps(e))
                    .cloned()
                    .collect();
                items.extend(flatten(notes).into_iter().cloned());
                sort_by_last_modified(&mut items);

                info!(
                    "Aggregated {} of {} entries ({} build)",
                    items.len(),
                    loaded.len(),
                    self.mode
                );
                Ok(items)
            })
            .map(Vec::as_slice)
    }

    /// Union of normalized tags across [`Self::items`].
    pub fn tags(&self) -> Result<&[String]> {
        self.tags
            .get_or_try_init(|| Ok(clean_tags(self.items()?.iter().flat_map(|e| e.base.tags.iter()))))
            .map(Vec::as_slice)
    }

    /// Items of one kind, in item order.
    pub fn of_kind(&self, kind: Kind) -> Result<Vec<&Entry>> {
        Ok(self.items()?.iter().filter(|e| e.kind() == kind).collect())
    }

    pub fn find(&self, id: &str) -> Result<&Entry> {
        let wanted = id.trim_matches('/').to_lowercase();
        self.items()?
            .iter()
            .find(|e| e.id().to_lowercase() == wanted)
            .ok_or_else(|| GardenError::EntryNotFound(id.to_string()))
    }
}
