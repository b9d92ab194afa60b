//! # Configuration
//!
//! Site configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `GARDEN_MODE`, `GARDEN_SITE_URL`, `GARDEN_CDN_API_KEY`, etc.
//! 2. **Site Config**: `garden.toml` in the site root.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `content_dir` | `src/content` | Root of the content collections |
//! | `site_url` | `https://example.com` | Absolute base URL for feeds and the sitemap |
//! | `site_title` | `Garden` | Feed title |
//! | `site_description` | `""` | Feed description |
//! | `feed_language` | `en-ca` | `<language>` of the RSS channel |
//! | `mode` | `development` | `development` keeps everything, `production` redacts |
//! | `private_namespaces` | `["private"]` | Id prefixes that are never public |
//! | `static_pages` | `["/", "/notes/", "/about/", "/likes/"]` | Extra sitemap paths |
//! | `itunes_dir` | `src/content/itunes` | Directory of `albums.yaml`, `books.yaml`, `podcasts.yaml` |
//! | `cdn_cloud_name` | unset | Image CDN account name |
//! | `cdn_folder` | `mu` | Asset folder cached by `garden cdn cache` |
//! | `cdn_cache_dir` | `lib/cloudinary` | Where resource snapshots are written |
//! | `cdn_api_key` / `cdn_api_secret` | unset | Admin API credentials |
//!
//! Relative paths are resolved against the site root by [`SiteConfig::resolve`].

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const CONFIG_FILE: &str = "garden.toml";

/// Whether a build redacts private and unpublished content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        self == BuildMode::Production
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildMode::Development => f.write_str("development"),
            BuildMode::Production => f.write_str("production"),
        }
    }
}

fn default_static_pages() -> Vec<String> {
    ["/", "/notes/", "/about/", "/likes/"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Configuration for a garden site, stored in `garden.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    #[config(env = "GARDEN_CONTENT_DIR", default = "src/content")]
    pub content_dir: PathBuf,

    #[config(env = "GARDEN_SITE_URL", default = "https://example.com")]
    pub site_url: String,

    #[config(env = "GARDEN_SITE_TITLE", default = "Garden")]
    pub site_title: String,

    #[config(env = "GARDEN_SITE_DESCRIPTION", default = "")]
    pub site_description: String,

    #[config(env = "GARDEN_FEED_LANGUAGE", default = "en-ca")]
    pub feed_language: String,

    #[config(env = "GARDEN_MODE", default = "development")]
    pub mode: BuildMode,

    #[config(
        env = "GARDEN_PRIVATE_NAMESPACES",
        parse_env = confique::env::parse::list_by_comma,
        default = ["private"]
    )]
    pub private_namespaces: Vec<String>,

    #[config(default = ["/", "/notes/", "/about/", "/likes/"])]
    pub static_pages: Vec<String>,

    #[config(env = "GARDEN_ITUNES_DIR", default = "src/content/itunes")]
    pub itunes_dir: PathBuf,

    #[config(env = "GARDEN_CDN_CLOUD_NAME")]
    pub cdn_cloud_name: Option<String>,

    #[config(env = "GARDEN_CDN_FOLDER", default = "mu")]
    pub cdn_folder: String,

    #[config(env = "GARDEN_CDN_CACHE_DIR", default = "lib/cloudinary")]
    pub cdn_cache_dir: PathBuf,

    #[config(env = "GARDEN_CDN_API_KEY")]
    pub cdn_api_key: Option<String>,

    #[config(env = "GARDEN_CDN_API_SECRET")]
    pub cdn_api_secret: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("src/content"),
            site_url: "https://example.com".to_string(),
            site_title: "Garden".to_string(),
            site_description: String::new(),
            feed_language: "en-ca".to_string(),
            mode: BuildMode::Development,
            private_namespaces: vec!["private".to_string()],
            static_pages: default_static_pages(),
            itunes_dir: PathBuf::from("src/content/itunes"),
            cdn_cloud_name: None,
            cdn_folder: "mu".to_string(),
            cdn_cache_dir: PathBuf::from("lib/cloudinary"),
            cdn_api_key: None,
            cdn_api_secret: None,
        }
    }
}

impl SiteConfig {
    /// Loads the layered configuration for the site rooted at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let config = SiteConfig::builder()
            .env()
            .file(root.join(CONFIG_FILE))
            .load()?;
        Ok(config.resolve(root))
    }

    /// Makes relative directories absolute against `root`.
    pub fn resolve(mut self, root: &Path) -> Self {
        for dir in [
            &mut self.content_dir,
            &mut self.itunes_dir,
            &mut self.cdn_cache_dir,
        ] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// `site_url` without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_no_file() {
        let temp = TempDir::new().unwrap();
        let config = SiteConfig::load(temp.path()).unwrap();

        assert_eq!(config.content_dir, temp.path().join("src/content"));
        assert_eq!(config.private_namespaces, vec!["private"]);
        assert_eq!(config.static_pages, default_static_pages());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "site_url = \"https://garden.test/\"\nmode = \"production\"\ncontent_dir = \"/abs/content\"\n",
        )
        .unwrap();

        let config = SiteConfig::load(temp.path()).unwrap();
        assert_eq!(config.base_url(), "https://garden.test");
        assert!(config.mode.is_production());
        assert_eq!(config.content_dir, PathBuf::from("/abs/content"));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "mode = \"staging\"\n").unwrap();
        assert!(matches!(
            SiteConfig::load(temp.path()),
            Err(crate::error::GardenError::Config(_))
        ));
    }

    #[test]
    fn test_default_matches_compiled_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.mode, BuildMode::Development);
        assert_eq!(config.feed_language, "en-ca");
    }
}
