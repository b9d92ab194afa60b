use super::ContentStore;
use crate::error::{GardenError, Result};
use crate::frontmatter::parse_document;
use crate::model::{Collection, RawEntry};
use crate::slug::path_slug;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Reads collections from `<content_dir>/<collection>/**/*.{md,mdx}`.
pub struct FileStore {
    content_dir: PathBuf,
}

impl FileStore {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.content_dir.join(collection.dir_name())
    }

    fn is_content_file(path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('_') || n.starts_with('.'));
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| CONTENT_EXTENSIONS.contains(&e));
        !hidden && ext_ok
    }

    fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::collect_files(&path, out)?;
            } else if Self::is_content_file(&path) {
                out.push(path);
            }
        }
        Ok(())
    }

    fn read_entry(&self, collection: Collection, root: &Path, path: &Path) -> Result<RawEntry> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| GardenError::Source {
                collection: collection.to_string(),
                message: format!("{} is outside the collection", path.display()),
            })?
            .to_string_lossy()
            .to_string();

        let source = fs::read_to_string(path)?;
        let (frontmatter, body) = parse_document(&source, &path.display().to_string())?;

        let id = frontmatter
            .slug
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| path_slug(&relative));

        Ok(RawEntry::new(collection, id, frontmatter)
            .with_body(body)
            .with_path(path))
    }
}

impl ContentStore for FileStore {
    fn load_collection(&self, collection: Collection) -> Result<Vec<RawEntry>> {
        let root = self.collection_dir(collection);
        if !root.is_dir() {
            debug!("No {} directory at {}", collection, root.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        Self::collect_files(&root, &mut files)?;
        files.sort();

        files
            .iter()
            .map(|path| self.read_entry(collection, &root, path))
            .collect()
    }
}
