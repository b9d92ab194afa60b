//! Resource snapshots on disk.
//!
//! A snapshot is written to `<cache_dir>/resources.<folder>.json`:
//!
//! ```json
//! {
//!   "date": "2024-05-01 10:00:00",
//!   "mu": { "count": 2, "resources": [ ... ] }
//! }
//! ```

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::Resource;
use crate::error::{GardenError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderResources {
    pub count: usize,
    pub resources: Vec<Resource>,
}

pub fn snapshot_path(cache_dir: &Path, folder: &str) -> PathBuf {
    cache_dir.join(format!("resources.{}.json", folder))
}

/// Writes the snapshot and returns its path.
pub fn write_snapshot(
    cache_dir: &Path,
    folder: &str,
    resources: Vec<Resource>,
    taken_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let mut root = Map::new();
    root.insert(
        "date".to_string(),
        Value::String(taken_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    );
    let folder_value = FolderResources {
        count: resources.len(),
        resources,
    };
    root.insert(folder.to_string(), serde_json::to_value(&folder_value)?);

    fs::create_dir_all(cache_dir)?;
    let path = snapshot_path(cache_dir, folder);
    fs::write(&path, serde_json::to_string_pretty(&Value::Object(root))?)?;
    info!("Updated {} ({} resources)", path.display(), folder_value.count);
    Ok(path)
}

/// Reads the resources of `folder` back from its snapshot.
pub fn read_snapshot(cache_dir: &Path, folder: &str) -> Result<Vec<Resource>> {
    let path = snapshot_path(cache_dir, folder);
    if !path.exists() {
        return Err(GardenError::SnapshotMissing(path));
    }

    let mut root: Map<String, Value> = serde_json::from_str(&fs::read_to_string(&path)?)?;
    let folder_value = root.remove(folder).ok_or_else(|| {
        GardenError::Cdn(format!("{} has no \"{}\" section", path.display(), folder))
    })?;
    let parsed: FolderResources = serde_json::from_value(folder_value)?;
    Ok(parsed.resources)
}

/// The `date` stamp of a snapshot, as written.
pub fn snapshot_date(cache_dir: &Path, folder: &str) -> Result<Option<String>> {
    let path = snapshot_path(cache_dir, folder);
    if !path.exists() {
        return Err(GardenError::SnapshotMissing(path));
    }
    let root: Map<String, Value> = serde_json::from_str(&fs::read_to_string(&path)?)?;
    Ok(root.get("date").and_then(Value::as_str).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn resource(id: &str) -> Resource {
        serde_json::from_value(serde_json::json!({
            "public_id": id,
            "width": 800,
            "height": 600,
            "asset_folder": "mu",
            "tags": ["a"]
        }))
        .unwrap()
    }

    #[test]
    fn test_snapshot_layout() {
        let temp = TempDir::new().unwrap();
        let taken = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let path = write_snapshot(temp.path(), "mu", vec![resource("mu/a"), resource("mu/b")], taken).unwrap();

        assert!(path.ends_with("resources.mu.json"));
        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["date"], "2024-05-01 10:00:00");
        assert_eq!(json["mu"]["count"], 2);
        assert_eq!(json["mu"]["resources"][0]["asset_folder"], "mu");
    }

    #[test]
    fn test_read_back() {
        let temp = TempDir::new().unwrap();
        write_snapshot(temp.path(), "mu", vec![resource("mu/a")], Utc::now()).unwrap();

        let resources = read_snapshot(temp.path(), "mu").unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].width, Some(800));
        assert!(snapshot_date(temp.path(), "mu").unwrap().is_some());
    }

    #[test]
    fn test_missing_snapshot() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            read_snapshot(temp.path(), "mu"),
            Err(GardenError::SnapshotMissing(_))
        ));
    }
}
