use super::{ImageListOptions, ImageService, ImageSummary, NONE_LABEL, split_reference};
use crate::error::{Result, VesselError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

const INDEX_FILE: &str = "images.json";

/// An image as recorded in the storage index.
#[derive(Debug, Deserialize)]
struct StoredImage {
    id: String,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    digest: Option<String>,
    created: DateTime<Utc>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    intermediate: bool,
}

impl StoredImage {
    fn into_summaries(self) -> Vec<ImageSummary> {
        let rows: Vec<(String, String)> = if self.names.is_empty() {
            vec![(NONE_LABEL.to_string(), NONE_LABEL.to_string())]
        } else {
            self.names.iter().map(|name| split_reference(name)).collect()
        };

        rows.into_iter()
            .map(|(repository, tag)| ImageSummary {
                id: self.id.clone(),
                repository,
                tag,
                digest: self.digest.clone(),
                created: self.created,
                size: self.size,
                intermediate: self.intermediate,
            })
            .collect()
    }
}

/// Image service reading the engine's storage directory in-process.
///
/// The storage root holds an `images.json` index; a root without one simply
/// has no images yet.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self) -> Result<Vec<StoredImage>> {
        let path = self.root.join(INDEX_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no image index, storage is empty");
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            VesselError::config_with_source("Failed to read image index", path.to_str(), e)
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            VesselError::config_with_source("Failed to parse image index", path.to_str(), e)
        })
    }
}

impl ImageService for LocalImageStore {
    fn list(
        &self,
        cancel: &CancellationToken,
        options: &ImageListOptions,
    ) -> Result<Vec<ImageSummary>> {
        if cancel.is_cancelled() {
            return Err(VesselError::Cancelled);
        }

        let images: Vec<ImageSummary> = self
            .load()?
            .into_iter()
            .flat_map(StoredImage::into_summaries)
            .filter(|image| options.accepts(image))
            .collect();

        tracing::debug!(root = %self.root.display(), count = images.len(), "listed local images");
        Ok(images)
    }
}
