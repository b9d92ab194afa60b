use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GardenError {
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Frontmatter error in {path}: {message}")]
    Frontmatter { path: String, message: String },

    #[error("Entry '{id}' in '{collection}' is missing required field '{field}'")]
    MissingField {
        collection: String,
        id: String,
        field: &'static str,
    },

    #[error("Parent cycle detected between entries: {}", .0.join(" -> "))]
    ParentCycle(Vec<String>),

    #[error("Failed to load collection '{collection}': {message}")]
    Source { collection: String, message: String },

    #[error("CDN error: {0}")]
    Cdn(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Markdown error: {0}")]
    Markdown(String),

    #[error("Snapshot not found: {0}")]
    SnapshotMissing(PathBuf),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for GardenError {
    fn from(err: serde_yaml::Error) -> Self {
        GardenError::Frontmatter {
            path: "<yaml>".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<confique::Error> for GardenError {
    fn from(err: confique::Error) -> Self {
        GardenError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GardenError>;
