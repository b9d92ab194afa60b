use crate::config::SiteConfig;
use crate::model::Collection;
use crate::store::fs::FileStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway site root with the default layout.
pub struct TestSite {
    // Held so the directory lives as long as the test
    pub _temp_dir: TempDir,
    pub root: PathBuf,
    pub config: SiteConfig,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSite {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let config = SiteConfig::default().resolve(&root);
        Self {
            _temp_dir: temp_dir,
            root,
            config,
        }
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.config.content_dir)
    }

    /// Writes `<collection>/<relative>` with the given frontmatter and body.
    pub fn write(&self, collection: Collection, relative: &str, frontmatter: &str, body: &str) -> PathBuf {
        let path = self.config.content_dir.join(collection.dir_name()).join(relative);
        write_file(&path, &format!("---\n{}\n---\n{}", frontmatter.trim(), body));
        path
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create dirs");
    }
    fs::write(path, content).expect("failed to write file");
}
