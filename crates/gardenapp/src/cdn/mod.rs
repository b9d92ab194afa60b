//! # Image CDN
//!
//! Images live on an image CDN under one asset folder. Rendering never calls the
//! CDN: `garden cdn cache` downloads the folder's resource list once into a JSON
//! snapshot ([`snapshot`]), and the markdown pipeline reads dimensions, alt text
//! and captions from that snapshot.
//!
//! ## Delivery URLs
//!
//! Optimized URLs insert a transformation segment after the delivery type:
//!
//! ```text
//! https://res.cloudinary.com/<cloud>/image/upload/<public_id>
//! https://res.cloudinary.com/<cloud>/image/upload/c_scale,w_700,f_auto,q_auto/<public_id>
//! ```
//!
//! `upload/`, `fetch/` and `youtube/` delivery types are recognized.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{GardenError, Result};

pub mod client;
pub mod snapshot;

/// Widths offered in `srcset`, from a 1x phone layout up to a 3x desktop one.
pub const SRCSET_WIDTHS: &[u32] = &[350, 700, 850, 1020, 1200, 1440, 1680, 1920, 2160];

/// Width of the default `src`.
pub const DEFAULT_WIDTH: u32 = 1440;

pub const SIZES: &str = "(min-width: 768px) 768px, 100vw";

const DELIVERY_TYPES: &[&str] = &["upload/", "fetch/", "youtube/"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomContext {
    /// "Description" in the CDN's contextual metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// "Title" in the CDN's contextual metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomContext>,
}

/// One asset as returned by the admin API. Fields the pipeline does not use are
/// kept in `extra` so snapshots round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub public_id: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResourceContext>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Resource {
    pub fn alt(&self) -> Option<&str> {
        self.custom().and_then(|c| c.alt.as_deref())
    }

    pub fn caption(&self) -> Option<&str> {
        self.custom()
            .and_then(|c| c.caption.as_deref())
            .filter(|c| !c.trim().is_empty())
    }

    fn custom(&self) -> Option<&CustomContext> {
        self.context.as_ref().and_then(|c| c.custom.as_ref())
    }
}

/// True iff `src` points into the CDN asset folder.
pub fn is_cdn_image(src: &str, folder: &str) -> bool {
    src.contains(&format!("{}/", folder.trim_matches('/')))
}

/// Inserts a scale/format/quality transformation into a full CDN URL.
pub fn insert_optimization_transformations(url: &str, width: u32) -> Result<String> {
    if !url.contains("cloudinary") {
        return Err(GardenError::Cdn(format!("Not a CDN URL: {}", url)));
    }
    for delivery in DELIVERY_TYPES {
        if url.contains(delivery) {
            let transformed = format!("{}c_scale,w_{},f_auto,q_auto/", delivery, width);
            return Ok(url.replacen(delivery, &transformed, 1));
        }
    }
    Ok(url.to_string())
}

/// Optimized upload URL for a public id.
pub fn delivery_url(cloud_name: &str, public_id: &str, width: u32) -> String {
    format!(
        "https://res.cloudinary.com/{}/image/upload/c_scale,f_auto,q_auto,w_{}/{}",
        cloud_name,
        width,
        public_id.trim_start_matches('/')
    )
}

/// Optimized fetch URL for a remote image.
pub fn fetch_url(cloud_name: &str, remote: &str, width: u32) -> String {
    format!(
        "https://res.cloudinary.com/{}/image/fetch/c_scale,f_auto,q_auto,w_{}/{}",
        cloud_name, width, remote
    )
}

/// Resources from a snapshot, indexed by public id.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    cloud_name: String,
    folder: String,
    by_public_id: HashMap<String, Resource>,
}

impl ImageCatalog {
    pub fn new(cloud_name: impl Into<String>, folder: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            folder: folder.into(),
            by_public_id: resources
                .into_iter()
                .map(|r| (r.public_id.clone(), r))
                .collect(),
        }
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn len(&self) -> usize {
        self.by_public_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_public_id.is_empty()
    }

    pub fn is_cdn_image(&self, src: &str) -> bool {
        is_cdn_image(src, &self.folder)
    }

    /// Finds the resource an image `src` refers to. The public id is the part of
    /// the path starting at the asset folder, without extension.
    pub fn find(&self, src: &str) -> Option<&Resource> {
        let marker = format!("{}/", self.folder.trim_matches('/'));
        let start = src.find(&marker)?;
        let tail = &src[start..];
        let tail = tail.split(['?', '#']).next().unwrap_or(tail);

        if let Some(found) = self.by_public_id.get(tail) {
            return Some(found);
        }
        let stem = match tail.rsplit_once('.') {
            Some((stem, ext)) if !ext.contains('/') => stem,
            _ => tail,
        };
        self.by_public_id.get(stem)
    }

    pub fn url(&self, resource: &Resource, width: u32) -> String {
        delivery_url(&self.cloud_name, &resource.public_id, width)
    }

    pub fn srcset(&self, resource: &Resource) -> String {
        SRCSET_WIDTHS
            .iter()
            .map(|&w| format!("{} {}w", self.url(resource, w), w))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(public_id: &str, alt: Option<&str>, caption: Option<&str>) -> Resource {
        Resource {
            public_id: public_id.to_string(),
            width: Some(1600),
            height: Some(900),
            format: Some("jpg".into()),
            secure_url: None,
            context: Some(ResourceContext {
                custom: Some(CustomContext {
                    alt: alt.map(str::to_string),
                    caption: caption.map(str::to_string),
                }),
            }),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_is_cdn_image() {
        assert!(is_cdn_image("mu/photo.jpg", "mu"));
        assert!(is_cdn_image("https://res.cloudinary.com/x/image/upload/v1/mu/photo", "mu/"));
        assert!(!is_cdn_image("/images/photo.jpg", "mu"));
    }

    #[test]
    fn test_insert_transformations() {
        let url = "https://res.cloudinary.com/x/image/upload/v1/mu/a.jpg";
        assert_eq!(
            insert_optimization_transformations(url, 720).unwrap(),
            "https://res.cloudinary.com/x/image/upload/c_scale,w_720,f_auto,q_auto/v1/mu/a.jpg"
        );

        let fetch = "https://res.cloudinary.com/x/image/fetch/https://i.test/a.png";
        assert!(insert_optimization_transformations(fetch, 300)
            .unwrap()
            .contains("fetch/c_scale,w_300,f_auto,q_auto/https://"));
    }

    #[test]
    fn test_insert_transformations_rejects_other_hosts() {
        assert!(matches!(
            insert_optimization_transformations("https://img.test/a.jpg", 100),
            Err(GardenError::Cdn(_))
        ));
    }

    #[test]
    fn test_delivery_url() {
        assert_eq!(
            delivery_url("demo", "mu/a", 350),
            "https://res.cloudinary.com/demo/image/upload/c_scale,f_auto,q_auto,w_350/mu/a"
        );
    }

    #[test]
    fn test_catalog_find_strips_extension_and_prefix() {
        let catalog = ImageCatalog::new("demo", "mu", vec![resource("mu/sunset", None, None)]);
        assert!(catalog.find("mu/sunset.jpg").is_some());
        assert!(catalog.find("https://res.cloudinary.com/demo/image/upload/v12/mu/sunset.jpg?x=1").is_some());
        assert!(catalog.find("mu/missing.jpg").is_none());
    }

    #[test]
    fn test_srcset_covers_every_width() {
        let catalog = ImageCatalog::new("demo", "mu", vec![]);
        let srcset = catalog.srcset(&resource("mu/a", None, None));
        assert_eq!(srcset.split(", ").count(), SRCSET_WIDTHS.len());
        assert!(srcset.ends_with("w_2160/mu/a 2160w"));
    }

    #[test]
    fn test_caption_ignores_blank() {
        assert!(resource("mu/a", None, Some("  ")).caption().is_none());
        assert_eq!(resource("mu/a", Some("Alt"), None).alt(), Some("Alt"));
    }
}
