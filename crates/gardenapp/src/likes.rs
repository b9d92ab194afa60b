//! # Likes
//!
//! The likes page lists albums, books and podcasts. Each medium is a YAML list
//! kept under the iTunes directory:
//!
//! ```yaml
//! - date: 2024-03-02
//!   id: 1440857781
//!   name: Optional display title
//! ```
//!
//! Artwork, links and fallback titles come from the iTunes lookup API through the
//! [`ItunesLookup`] trait. The list always wins over the API for the title and the
//! date. Results missing any required field, and repeated ids, are dropped.
//!
//! A failed lookup never fails the build: it is logged and yields no items.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::cdn::fetch_url;
use crate::error::{GardenError, Result};
use crate::model::parse_date;

const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";
const ARTWORK_WIDTH: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Albums,
    Books,
    Podcasts,
}

impl Medium {
    pub fn all() -> &'static [Medium] {
        &[Medium::Albums, Medium::Books, Medium::Podcasts]
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Medium::Albums => "albums.yaml",
            Medium::Books => "books.yaml",
            Medium::Podcasts => "podcasts.yaml",
        }
    }

    /// `media` parameter of the lookup API.
    pub fn media(self) -> &'static str {
        match self {
            Medium::Albums => "music",
            Medium::Books => "ebook",
            Medium::Podcasts => "podcast",
        }
    }

    /// `entity` parameter of the lookup API.
    pub fn entity(self) -> &'static str {
        match self {
            Medium::Albums => "album",
            Medium::Books => "ebook",
            Medium::Podcasts => "podcast",
        }
    }
}

impl std::fmt::Display for Medium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Medium::Albums => "albums",
            Medium::Books => "books",
            Medium::Podcasts => "podcasts",
        };
        f.write_str(name)
    }
}

/// One row of a likes list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub date: String,
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// The fields of a lookup result the page uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupResult {
    pub artist_name: Option<String>,
    pub artwork_url100: Option<String>,
    pub collection_id: Option<u64>,
    pub collection_name: Option<String>,
    pub collection_censored_name: Option<String>,
    pub collection_view_url: Option<String>,
    pub release_date: Option<String>,
    pub track_id: Option<u64>,
    pub track_view_url: Option<String>,
}

impl LookupResult {
    pub fn result_id(&self) -> Option<u64> {
        self.collection_id.or(self.track_id)
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<Option<LookupResult>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Like {
    pub artist: Option<String>,
    pub title: String,
    pub id: u64,
    pub date: DateTime<Utc>,
    pub link: String,
    pub image_url: String,
}

pub trait ItunesLookup {
    fn lookup(&self, ids: &[u64], medium: Medium) -> Result<Vec<LookupResult>>;
}

pub struct HttpItunesLookup {
    lookup_url: String,
    http_client: reqwest::blocking::Client,
}

impl HttpItunesLookup {
    pub fn new() -> Result<Self> {
        Self::with_lookup_url(LOOKUP_URL)
    }

    pub fn with_lookup_url(lookup_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            lookup_url: lookup_url.into(),
            http_client,
        })
    }
}

impl ItunesLookup for HttpItunesLookup {
    fn lookup(&self, ids: &[u64], medium: Medium) -> Result<Vec<LookupResult>> {
        let ids = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
        let response = self
            .http_client
            .get(&self.lookup_url)
            .query(&[
                ("id", ids.as_str()),
                ("country", "CA"),
                ("media", medium.media()),
                ("entity", medium.entity()),
                ("sort", "recent"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(GardenError::Source {
                collection: medium.to_string(),
                message: format!("lookup returned {}: {}", status.as_u16(), message),
            });
        }

        let parsed: LookupResponse = response.json()?;
        Ok(parsed.results.into_iter().flatten().collect())
    }
}

/// Reads the likes list of `medium` from `dir`. A missing file is an empty list.
pub fn load_list(dir: &Path, medium: Medium) -> Result<Vec<ListItem>> {
    let path = dir.join(medium.file_name());
    if !path.exists() {
        debug!("No likes list at {}", path.display());
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(&content).map_err(|e| GardenError::Frontmatter {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Artwork at a usable size, delivered through the CDN when one is configured.
pub fn artwork_url(artwork_url100: &str, cloud_name: Option<&str>) -> String {
    let larger = artwork_url100.replace("100x100bb", "400x0w");
    match cloud_name {
        Some(cloud) => fetch_url(cloud, &larger, ARTWORK_WIDTH),
        None => larger,
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Joins lookup results with the list they were looked up for. Newest first.
pub fn merge_results(items: &[ListItem], results: Vec<LookupResult>, cloud_name: Option<&str>) -> Vec<Like> {
    let mut seen = HashSet::new();
    let mut likes = Vec::new();

    for result in results {
        let Some(id) = result.result_id() else {
            debug!("Dropped lookup result without an id");
            continue;
        };
        let Some(item) = items.iter().find(|item| item.id == id) else {
            debug!("Dropped lookup result {} with no matching list item", id);
            continue;
        };

        let title = non_empty(Some(&item.name))
            .or_else(|| non_empty(result.collection_name.as_ref()))
            .or_else(|| non_empty(result.collection_censored_name.as_ref()));
        let date = parse_date(&item.date).or_else(|| result.release_date.as_deref().and_then(parse_date));
        let link = non_empty(result.collection_view_url.as_ref()).or_else(|| non_empty(result.track_view_url.as_ref()));
        let image = non_empty(result.artwork_url100.as_ref()).map(|art| artwork_url(art, cloud_name));

        let (Some(title), Some(date), Some(link), Some(image_url)) = (title, date, link, image) else {
            info!("Removed incomplete lookup result {}", id);
            continue;
        };
        if !seen.insert(id) {
            info!("Removed duplicate lookup result {}", id);
            continue;
        }

        likes.push(Like {
            artist: result.artist_name.clone(),
            title: title.to_string(),
            id,
            date,
            link: link.to_string(),
            image_url,
        });
    }

    likes.sort_by(|a, b| b.date.cmp(&a.date));
    likes
}

/// Looks up and merges one medium. Lookup failures are logged and yield nothing.
pub fn fetch_likes<L: ItunesLookup + ?Sized>(
    lookup: &L,
    items: &[ListItem],
    medium: Medium,
    cloud_name: Option<&str>,
) -> Vec<Like> {
    if items.is_empty() {
        return Vec::new();
    }
    let ids: Vec<u64> = items.iter().map(|item| item.id).collect();
    match lookup.lookup(&ids, medium) {
        Ok(results) => merge_results(items, results, cloud_name),
        Err(e) => {
            warn!("Looking up {} failed: {}", medium, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FakeLookup(Result<Vec<LookupResult>>);

    impl ItunesLookup for FakeLookup {
        fn lookup(&self, _ids: &[u64], _medium: Medium) -> Result<Vec<LookupResult>> {
            match &self.0 {
                Ok(results) => Ok(results.clone()),
                Err(e) => Err(GardenError::Cdn(e.to_string())),
            }
        }
    }

    fn item(id: u64, date: &str, name: &str) -> ListItem {
        ListItem {
            date: date.into(),
            id,
            name: name.into(),
        }
    }

    fn result(collection_id: u64, name: &str) -> LookupResult {
        LookupResult {
            artist_name: Some("Artist".into()),
            artwork_url100: Some(format!("https://is1.test/{}/100x100bb.jpg", collection_id)),
            collection_id: Some(collection_id),
            collection_name: Some(name.into()),
            collection_view_url: Some(format!("https://music.test/{}", collection_id)),
            release_date: Some("2020-01-01T00:00:00Z".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_prefers_list_and_sorts_newest_first() {
        let items = vec![item(1, "2024-01-05", ""), item(2, "2024-03-01", "Listed Name")];
        let likes = merge_results(&items, vec![result(1, "API One"), result(2, "API Two")], None);

        assert_eq!(likes.len(), 2);
        assert_eq!(likes[0].id, 2);
        assert_eq!(likes[0].title, "Listed Name");
        assert_eq!(likes[1].title, "API One");
        assert_eq!(likes[1].image_url, "https://is1.test/1/400x0w.jpg");
    }

    #[test]
    fn test_merge_drops_incomplete_duplicate_and_unknown() {
        let items = vec![item(1, "2024-01-05", "One"), item(3, "2024-01-06", "Three")];
        let mut no_link = result(3, "Three");
        no_link.collection_view_url = None;

        let likes = merge_results(
            &items,
            vec![result(1, "One"), result(1, "One again"), no_link, result(9, "Unlisted")],
            None,
        );
        assert_eq!(likes.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_track_id_and_cdn_artwork() {
        let items = vec![item(7, "2024-02-02", "Pod")];
        let track = LookupResult {
            track_id: Some(7),
            track_view_url: Some("https://pod.test/7".into()),
            artwork_url100: Some("https://is1.test/a/100x100bb.jpg".into()),
            ..Default::default()
        };
        let likes = merge_results(&items, vec![track], Some("demo"));
        assert_eq!(likes[0].link, "https://pod.test/7");
        assert_eq!(
            likes[0].image_url,
            "https://res.cloudinary.com/demo/image/fetch/c_scale,f_auto,q_auto,w_600/https://is1.test/a/400x0w.jpg"
        );
    }

    #[test]
    fn test_lookup_failure_yields_nothing() {
        let lookup = FakeLookup(Err(GardenError::Cdn("offline".into())));
        assert!(fetch_likes(&lookup, &[item(1, "2024-01-01", "x")], Medium::Albums, None).is_empty());
    }

    #[test]
    fn test_load_list() {
        let temp = TempDir::new().unwrap();
        assert!(load_list(temp.path(), Medium::Books).unwrap().is_empty());

        fs::write(
            temp.path().join("books.yaml"),
            "- date: 2024-03-02\n  id: 42\n  name: Dune\n- date: 2023-01-01\n  id: 43\n",
        )
        .unwrap();
        let list = load_list(temp.path(), Medium::Books).unwrap();
        assert_eq!(list, vec![item(42, "2024-03-02", "Dune"), item(43, "2023-01-01", "")]);
    }
}
