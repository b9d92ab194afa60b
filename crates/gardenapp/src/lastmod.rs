//! Last-modified timestamps from version control.
//!
//! [`GitLastModified`] asks git for the committer date of the last commit that
//! touched a file. Content often lives in a git submodule, so a file inside one is
//! looked up from the submodule's own checkout.
//!
//! Lookups never fail the build: any git error is logged and the entry simply has
//! no timestamp.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub trait LastModifiedProvider: Sync {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// Provider that never knows a timestamp. Used for feeds and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLastModified;

impl LastModifiedProvider for NoLastModified {
    fn last_modified(&self, _path: &Path) -> Option<DateTime<Utc>> {
        None
    }
}

struct RepoLayout {
    root: PathBuf,
    submodules: Vec<PathBuf>,
}

pub struct GitLastModified {
    start_dir: PathBuf,
    layout: OnceCell<Option<RepoLayout>>,
}

impl GitLastModified {
    /// `start_dir` is any directory inside the repository.
    pub fn new(start_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_dir: start_dir.into(),
            layout: OnceCell::new(),
        }
    }

    fn git(dir: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git").arg("-C").arg(dir).args(args).output();
        match output {
            Ok(o) if o.status.success() => String::from_utf8(o.stdout)
                .ok()
                .map(|s| s.trim().to_string()),
            Ok(o) => {
                debug!(
                    "git {:?} failed: {}",
                    args,
                    String::from_utf8_lossy(&o.stderr).trim()
                );
                None
            }
            Err(e) => {
                warn!("Could not run git: {}", e);
                None
            }
        }
    }

    fn layout(&self) -> Option<&RepoLayout> {
        self.layout
            .get_or_init(|| {
                let root = PathBuf::from(Self::git(&self.start_dir, &["rev-parse", "--show-toplevel"])?);
                let submodules = Self::git(
                    &root,
                    &["config", "--file", ".gitmodules", "--get-regexp", "path"],
                )
                .map(|out| parse_submodule_paths(&out))
                .unwrap_or_default();
                Some(RepoLayout { root, submodules })
            })
            .as_ref()
    }
}

/// Parses `git config --get-regexp path` output (`submodule.x.path some/dir`).
fn parse_submodule_paths(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(PathBuf::from)
        .collect()
}

/// `path` relative to the repository `root`. Both sides are canonicalized when
/// they exist, so symlinks and `..` segments do not hide a file inside the repo.
fn repo_relative(root: &Path, path: &Path) -> Option<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    let absolute = fs::canonicalize(&absolute).unwrap_or(absolute);
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    match absolute.strip_prefix(&root) {
        Ok(relative) => Some(relative.to_path_buf()),
        Err(_) => {
            debug!("{} is outside the repository at {}", absolute.display(), root.display());
            None
        }
    }
}

impl LastModifiedProvider for GitLastModified {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        let layout = self.layout()?;
        let relative = repo_relative(&layout.root, path)?;
        let relative = relative.as_path();

        let (dir, file) = match layout.submodules.iter().find(|s| relative.starts_with(s)) {
            Some(sub) => (layout.root.join(sub), relative.strip_prefix(sub).ok()?),
            None => (layout.root.clone(), relative),
        };

        let file = file.to_string_lossy();
        let stamp = Self::git(&dir, &["log", "-1", "--pretty=format:%cI", "--", &file])?;
        if stamp.is_empty() {
            debug!("{} has no commits yet", path.display());
            return None;
        }

        match DateTime::parse_from_rfc3339(&stamp) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                warn!("Unexpected git date '{}' for {}: {}", stamp, path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submodule_paths() {
        let out = "submodule.content.path src/content\nsubmodule.assets.path public/assets\n";
        assert_eq!(
            parse_submodule_paths(out),
            vec![PathBuf::from("src/content"), PathBuf::from("public/assets")]
        );
    }

    #[test]
    fn test_repo_relative_resolves_dot_dot_segments() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("content/notes")).unwrap();
        std::fs::write(temp.path().join("content/rust.md"), "x").unwrap();

        let winding = temp.path().join("content/notes/../rust.md");
        assert_eq!(
            repo_relative(temp.path(), &winding),
            Some(PathBuf::from("content/rust.md"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_repo_relative_follows_symlinked_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let repo = temp.path().join("repo");
        std::fs::create_dir_all(&repo).unwrap();
        std::fs::write(repo.join("note.md"), "x").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&repo, &link).unwrap();

        assert_eq!(repo_relative(&repo, &link.join("note.md")), Some(PathBuf::from("note.md")));
        assert_eq!(repo_relative(&link, &repo.join("note.md")), Some(PathBuf::from("note.md")));
    }

    #[test]
    fn test_repo_relative_outside_root_is_none() {
        let repo = tempfile::TempDir::new().unwrap();
        let other = tempfile::TempDir::new().unwrap();
        let file = other.path().join("note.md");
        std::fs::write(&file, "x").unwrap();

        assert!(repo_relative(repo.path(), &file).is_none());
    }

    #[test]
    fn test_no_last_modified() {
        assert!(NoLastModified.last_modified(Path::new("a.md")).is_none());
    }

    #[test]
    fn test_outside_a_repository_yields_none() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("note.md");
        std::fs::write(&file, "x").unwrap();

        let provider = GitLastModified::new(temp.path());
        assert!(provider.last_modified(&file).is_none());
    }
}
