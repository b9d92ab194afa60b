//! # Content Stores
//!
//! The [`ContentStore`] trait is the only way content reaches the pipeline. A store
//! knows how to list the raw entries of one [`Collection`]; classification,
//! validation and nesting happen later.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: reads markdown files from the content directory.
//! - [`memory::InMemoryStore`]: holds raw entries in memory, for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! content/
//! ├── writing/        # posts and notes
//! │   └── garden/
//! │       └── my-note.md
//! ├── drafts/
//! ├── bookmarks/
//! ├── til/
//! └── pages/
//! ```
//!
//! Files whose name starts with `_` are ignored. Only `.md` and `.mdx` files are
//! content.
//!
//! Stores must be `Sync`: the aggregator loads every collection from its own thread.

use crate::error::Result;
use crate::model::{Collection, RawEntry};

pub mod fs;
pub mod memory;

pub trait ContentStore: Sync {
    /// Returns every raw entry of a collection, in a stable order.
    fn load_collection(&self, collection: Collection) -> Result<Vec<RawEntry>>;
}

impl<S: ContentStore + ?Sized> ContentStore for &S {
    fn load_collection(&self, collection: Collection) -> Result<Vec<RawEntry>> {
        (**self).load_collection(collection)
    }
}
