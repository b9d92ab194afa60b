use super::ContentStore;
use crate::error::{GardenError, Result};
use crate::model::{Collection, RawEntry};
use std::collections::{HashMap, HashSet};

/// Holds raw entries per collection. Collections can be marked as failing to
/// exercise error paths.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: HashMap<Collection, Vec<RawEntry>>,
    failing: HashSet<Collection>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: RawEntry) {
        self.entries.entry(entry.collection).or_default().push(entry);
    }

    pub fn fail_collection(&mut self, collection: Collection) {
        self.failing.insert(collection);
    }
}

impl ContentStore for InMemoryStore {
    fn load_collection(&self, collection: Collection) -> Result<Vec<RawEntry>> {
        if self.failing.contains(&collection) {
            return Err(GardenError::Source {
                collection: collection.to_string(),
                message: "store unavailable".to_string(),
            });
        }
        Ok(self.entries.get(&collection).cloned().unwrap_or_default())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Frontmatter;

    fn tag_list(tags: &[&str]) -> Option<Vec<Option<String>>> {
        Some(tags.iter().map(|t| Some(t.to_string())).collect())
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_raw(mut self, entry: RawEntry) -> Self {
            self.store.insert(entry);
            self
        }

        pub fn with_post(self, id: &str, date: Option<&str>, tags: &[&str]) -> Self {
            let mut all_tags = vec!["post"];
            all_tags.extend_from_slice(tags);
            let fm = Frontmatter {
                title: Some(format!("Post {}", id)),
                date: date.map(str::to_string),
                tags: tag_list(&all_tags),
                ..Default::default()
            };
            self.with_raw(RawEntry::new(Collection::Writing, id, fm).with_body("Post body"))
        }

        pub fn with_note(self, id: &str, parent: Option<&str>, tags: &[&str]) -> Self {
            let fm = Frontmatter {
                title: Some(format!("Note {}", id)),
                parent: parent.map(str::to_string),
                tags: tag_list(tags),
                ..Default::default()
            };
            self.with_raw(RawEntry::new(Collection::Writing, id, fm).with_body("Note body"))
        }

        pub fn with_private_note(self, id: &str, parent: Option<&str>) -> Self {
            let fm = Frontmatter {
                title: Some(format!("Private {}", id)),
                parent: parent.map(str::to_string),
                private: Some(true),
                ..Default::default()
            };
            self.with_raw(RawEntry::new(Collection::Writing, id, fm))
        }

        pub fn with_draft(self, id: &str, tags: &[&str]) -> Self {
            let fm = Frontmatter {
                title: Some(format!("Draft {}", id)),
                tags: tag_list(tags),
                ..Default::default()
            };
            self.with_raw(RawEntry::new(Collection::Drafts, id, fm))
        }

        pub fn with_bookmark(self, id: &str, source: &str, tags: &[&str]) -> Self {
            let fm = Frontmatter {
                title: Some(format!("Bookmark {}", id)),
                source: Some(source.to_string()),
                captured: Some("2024-01-01".to_string()),
                tags: tag_list(tags),
                ..Default::default()
            };
            self.with_raw(RawEntry::new(Collection::Bookmarks, id, fm))
        }

        pub fn with_til(self, id: &str, date: &str, tags: &[&str]) -> Self {
            let fm = Frontmatter {
                title: Some(format!("TIL {}", id)),
                date: Some(date.to_string()),
                tags: tag_list(tags),
                ..Default::default()
            };
            self.with_raw(RawEntry::new(Collection::Til, id, fm))
        }

        pub fn with_page(self, id: &str) -> Self {
            let fm = Frontmatter {
                title: Some(format!("Page {}", id)),
                ..Default::default()
            };
            self.with_raw(RawEntry::new(Collection::Pages, id, fm))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn test_fixture_places_entries_in_collections() {
        let fixture = StoreFixture::new()
            .with_post("p", Some("2024-01-01"), &[])
            .with_note("n", None, &[])
            .with_draft("d", &[]);

        let writing = fixture.store.load_collection(Collection::Writing).unwrap();
        assert_eq!(writing.len(), 2);
        assert_eq!(fixture.store.load_collection(Collection::Drafts).unwrap().len(), 1);
        assert!(fixture.store.load_collection(Collection::Til).unwrap().is_empty());
    }

    #[test]
    fn test_failing_collection() {
        let mut store = InMemoryStore::new();
        store.fail_collection(Collection::Til);
        assert!(matches!(
            store.load_collection(Collection::Til),
            Err(GardenError::Source { .. })
        ));
    }
}
