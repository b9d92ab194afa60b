use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::snapshot::write_snapshot;
use super::{is_cdn_image, Resource};
use crate::error::{GardenError, Result};

pub const PAGE_SIZE: u32 = 500;

const API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourcePage {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// The slice of the CDN admin API the site uses.
pub trait AdminApi {
    fn resources_by_asset_folder(&self, folder: &str, cursor: Option<&str>) -> Result<ResourcePage>;

    fn resource(&self, public_id: &str) -> Result<Resource>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

pub struct HttpAdminApi {
    credentials: Credentials,
    api_base_url: String,
    http_client: reqwest::blocking::Client,
}

impl HttpAdminApi {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, API_BASE_URL)
    }

    pub fn with_base_url(credentials: Credentials, api_base_url: impl Into<String>) -> Result<Self> {
        for (field, value) in [
            ("cdn_cloud_name", &credentials.cloud_name),
            ("cdn_api_key", &credentials.api_key),
            ("cdn_api_secret", &credentials.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(GardenError::Config(format!("{} must not be empty", field)));
            }
        }

        let http_client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            credentials,
            api_base_url: api_base_url.into(),
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.credentials.cloud_name,
            path
        )
    }

    fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .http_client
            .get(self.endpoint(path))
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(GardenError::Cdn(format!("{} {}: {}", status.as_u16(), path, message)));
        }
        Ok(response.json()?)
    }
}

impl AdminApi for HttpAdminApi {
    fn resources_by_asset_folder(&self, folder: &str, cursor: Option<&str>) -> Result<ResourcePage> {
        let page_size = PAGE_SIZE.to_string();
        let mut query = vec![
            ("asset_folder", folder),
            ("max_results", page_size.as_str()),
            ("context", "true"),
            ("metadata", "true"),
            ("tags", "true"),
        ];
        if let Some(cursor) = cursor {
            query.push(("next_cursor", cursor));
        }
        self.get("resources/by_asset_folder", &query)
    }

    fn resource(&self, public_id: &str) -> Result<Resource> {
        self.get(&format!("resources/image/upload/{}", public_id), &[])
    }
}

/// Fetches every resource in `folder`, following the page cursor until the API
/// stops returning one.
pub fn fetch_resources_by_asset_folder<A: AdminApi + ?Sized>(api: &A, folder: &str) -> Result<Vec<Resource>> {
    info!("Fetching all resources from folder \"{}\"", folder);
    let mut fetched = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api.resources_by_asset_folder(folder, cursor.as_deref())?;
        fetched.extend(page.resources);
        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!("Fetched {} resources from folder \"{}\"", fetched.len(), folder);
    Ok(fetched)
}

/// Details of a single image. Only paths inside the asset folder are accepted.
pub fn fetch_image_details<A: AdminApi + ?Sized>(api: &A, folder: &str, public_id: &str) -> Result<Resource> {
    if !is_cdn_image(public_id, folder) {
        return Err(GardenError::Cdn(format!("{} is not a CDN image path", public_id)));
    }
    api.resource(public_id)
}

/// Downloads the folder listing and writes it as a snapshot.
pub fn cache_resources<A: AdminApi + ?Sized>(
    api: &A,
    folder: &str,
    cache_dir: &Path,
    taken_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let resources = fetch_resources_by_asset_folder(api, folder)?;
    write_snapshot(cache_dir, folder, resources, taken_at)
}
