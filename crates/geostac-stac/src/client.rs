use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use geojson::Geometry;
use geostac_core::config::{
    LayeredConfig, DEFAULT_CATALOG_URL, DEFAULT_COLLECTION, DEFAULT_MAX_CLOUD_COVER,
    DEFAULT_PREVIEW_ASSET, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use geostac_core::error::{GeostacError, Result};
use geostac_core::models::Imagery;
use serde::{Deserialize, Serialize};

use crate::ports::ImageryCatalog;

/// Immutable settings of a STAC catalog client
#[derive(Debug, Clone, PartialEq)]
pub struct StacConfig {
    /// Base URL of the STAC API (e.g., "https://planetarycomputer.microsoft.com/api/stac/v1")
    pub base_url: String,

    /// Collection searched for scenes
    pub collection: String,

    /// Scenes must have cloud cover strictly below this percentage
    pub max_cloud_cover: f64,

    /// Asset whose `href` is reported as the image URL
    pub preview_asset: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for StacConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            max_cloud_cover: DEFAULT_MAX_CLOUD_COVER,
            preview_asset: DEFAULT_PREVIEW_ASSET.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl StacConfig {
    /// Take the resolved catalog settings of a layered configuration
    pub fn from_layered(config: &LayeredConfig) -> Self {
        Self {
            base_url: config.catalog_url.value.clone(),
            collection: config.collection.value.clone(),
            max_cloud_cover: config.max_cloud_cover.value,
            preview_asset: config.preview_asset.value.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs.value),
        }
    }

    /// Create with a custom base URL and default search settings
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

/// STAC API client implementing [`ImageryCatalog`]
pub struct StacClient {
    config: StacConfig,

    /// HTTP client, reused across lookups
    client: reqwest::Client,
}

impl StacClient {
    /// Create a new client
    pub fn new(config: StacConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build().map_err(|e| {
            GeostacError::CatalogUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
                remediation: "Check the TLS configuration of this host".to_string(),
            }
        })?;

        Ok(Self { config, client })
    }

    /// Body of the `POST /search` request for `geometry`
    pub fn search_request(&self, geometry: &Geometry) -> SearchRequest {
        let mut cloud_cover = HashMap::new();
        cloud_cover.insert("lt".to_string(), self.config.max_cloud_cover);

        let mut query = HashMap::new();
        query.insert("eo:cloud_cover".to_string(), cloud_cover);

        SearchRequest {
            collections: vec![self.config.collection.clone()],
            intersects: geometry.clone(),
            sortby: vec![SortBy {
                field: "properties.datetime".to_string(),
                direction: "desc".to_string(),
            }],
            query,
            limit: 1,
        }
    }

    fn unavailable(&self, reason: String) -> GeostacError {
        GeostacError::CatalogUnavailable {
            reason,
            remediation: format!(
                "Ensure the STAC API at {} is reachable and serves the '{}' collection",
                self.config.base_url, self.config.collection
            ),
        }
    }

    fn imagery_from_item(&self, item: StacItem) -> Result<Imagery> {
        let item_id = item.id.unwrap_or_else(|| "<unnamed>".to_string());

        let Some(asset) = item.assets.get(&self.config.preview_asset) else {
            return Err(self.unavailable(format!(
                "Item {} has no '{}' asset",
                item_id, self.config.preview_asset
            )));
        };

        let Some(date) = item.properties.datetime else {
            return Err(self.unavailable(format!("Item {} has no datetime", item_id)));
        };

        Ok(Imagery::new(asset.href.clone(), date))
    }
}

#[async_trait]
impl ImageryCatalog for StacClient {
    async fn newest_image(&self, geometry: &Geometry) -> Result<Option<Imagery>> {
        let request = self.search_request(geometry);

        tracing::debug!(
            collection = %self.config.collection,
            max_cloud_cover = self.config.max_cloud_cover,
            "Searching imagery catalog"
        );

        let response = self
            .client
            .post(self.config.search_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unavailable(format!("Failed to reach imagery catalog: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.unavailable(format!(
                "Imagery catalog error ({}): {}",
                status, error_text
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| self.unavailable(format!("Failed to parse search response: {}", e)))?;

        let Some(item) = body.features.into_iter().next() else {
            tracing::debug!(collection = %self.config.collection, "No qualifying scene found");
            return Ok(None);
        };

        let imagery = self.imagery_from_item(item)?;
        tracing::info!(date = %imagery.date, "Found satellite scene");
        Ok(Some(imagery))
    }

    fn collection(&self) -> &str {
        &self.config.collection
    }
}

/// Request body of a STAC item search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub collections: Vec<String>,
    pub intersects: Geometry,
    pub sortby: Vec<SortBy>,
    pub query: HashMap<String, HashMap<String, f64>>,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortBy {
    pub field: String,
    pub direction: String,
}

/// Response of a STAC item search (an ItemCollection)
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    features: Vec<StacItem>,
}

#[derive(Debug, Deserialize)]
struct StacItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: ItemProperties,
    #[serde(default)]
    assets: HashMap<String, StacAsset>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemProperties {
    #[serde(default)]
    datetime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StacAsset {
    href: String,
}
