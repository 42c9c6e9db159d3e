use super::{ImageListOptions, ImageService, ImageSummary, NONE_LABEL, split_reference};
use crate::client::{Client, ClientConfig, run_cancellable, translate_reqwest_error};
use crate::error::{Result, VesselError};
use chrono::{DateTime, Utc};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

const IMAGES_ENDPOINT: &str = "v4.0.0/libpod/images/json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EngineImage {
    id: String,
    #[serde(default)]
    repo_tags: Option<Vec<String>>,
    #[serde(default)]
    repo_digests: Option<Vec<String>>,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    size: i64,
}

impl EngineImage {
    fn into_summaries(self) -> Vec<ImageSummary> {
        let digest = self
            .repo_digests
            .as_ref()
            .and_then(|digests| digests.first())
            .and_then(|d| d.split_once('@'))
            .map(|(_, digest)| digest.to_string());
        let created = DateTime::<Utc>::from_timestamp(self.created, 0).unwrap_or_default();
        let size = u64::try_from(self.size).unwrap_or(0);

        let tags: Vec<String> = self
            .repo_tags
            .unwrap_or_default()
            .into_iter()
            .filter(|tag| tag != "<none>:<none>")
            .collect();

        let rows: Vec<(String, String)> = if tags.is_empty() {
            vec![(NONE_LABEL.to_string(), NONE_LABEL.to_string())]
        } else {
            tags.iter().map(|tag| split_reference(tag)).collect()
        };

        rows.into_iter()
            .map(|(repository, tag)| ImageSummary {
                id: self.id.clone(),
                repository,
                tag,
                digest: digest.clone(),
                created,
                size,
                intermediate: false,
            })
            .collect()
    }
}

/// Image service talking to a remote engine's REST API.
///
/// Filtering happens on the engine; the query carries `all` and the filters
/// as a JSON object of `key -> [values]`.
#[derive(Debug, Clone)]
pub struct TunnelImageService {
    endpoint: Url,
    config: ClientConfig,
}

impl TunnelImageService {
    /// Creates a service for the engine at `url` (`http://` or `https://`).
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::image::TunnelImageService;
    ///
    /// let service = TunnelImageService::new("http://localhost:8080").unwrap();
    /// assert_eq!(
    ///     service.endpoint().as_str(),
    ///     "http://localhost:8080/v4.0.0/libpod/images/json"
    /// );
    /// assert!(TunnelImageService::new("ssh://host").is_err());
    /// ```
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(url, ClientConfig::default())
    }

    pub fn with_config(url: &str, config: ClientConfig) -> Result<Self> {
        let mut base = Url::parse(url.trim()).map_err(|e| {
            VesselError::validation_with_source(format!("Invalid engine URL {:?}", url), e)
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(VesselError::validation(format!(
                "Unsupported engine URL scheme {:?}",
                base.scheme()
            )));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let endpoint = base.join(IMAGES_ENDPOINT).map_err(|e| {
            VesselError::validation_with_source(format!("Invalid engine URL {:?}", url), e)
        })?;

        Ok(Self { endpoint, config })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn encode_filters(options: &ImageListOptions) -> Result<Option<String>> {
        if options.filters.is_empty() {
            return Ok(None);
        }

        let mut filters: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for filter in &options.filters {
            filters.entry(filter.key()).or_default().push(filter.value());
        }

        serde_json::to_string(&filters)
            .map(Some)
            .map_err(|e| VesselError::validation_with_source("Failed to encode filters", e))
    }

    async fn fetch(&self, options: &ImageListOptions) -> Result<Vec<ImageSummary>> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .pool_max_idle_per_host(self.config.max_idle_per_host)
            .build()
            .map_err(|e| VesselError::network_with_source("Failed to create HTTP client", e))?;

        let mut query = vec![("all", options.all.to_string())];
        if let Some(filters) = Self::encode_filters(options)? {
            query.push(("filters", filters));
        }

        let target = self.endpoint.as_str();
        let response = http_client
            .get(self.endpoint.clone())
            .query(&query)
            .send()
            .await
            .map_err(|e| translate_reqwest_error(e, target, self.config.timeout_seconds))?;

        let response = Client::check_response_status(response).await?;
        let images: Vec<EngineImage> = response.json().await.map_err(|e| {
            VesselError::validation_with_source(
                format!("Invalid image list from {}", target),
                e,
            )
        })?;

        Ok(images
            .into_iter()
            .flat_map(EngineImage::into_summaries)
            .collect())
    }
}

impl ImageService for TunnelImageService {
    fn list(
        &self,
        cancel: &CancellationToken,
        options: &ImageListOptions,
    ) -> Result<Vec<ImageSummary>> {
        tracing::debug!(endpoint = %self.endpoint, all = options.all, "listing remote images");
        run_cancellable(cancel, self.fetch(options))
    }
}
