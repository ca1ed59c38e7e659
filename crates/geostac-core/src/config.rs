use crate::error::{GeostacError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Planetary Computer STAC API
pub const DEFAULT_CATALOG_URL: &str = "https://planetarycomputer.microsoft.com/api/stac/v1";
pub const DEFAULT_COLLECTION: &str = "sentinel-2-l2a";
pub const DEFAULT_MAX_CLOUD_COVER: f64 = 10.0;
pub const DEFAULT_PREVIEW_ASSET: &str = "rendered_preview";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered imagery catalog configuration
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub catalog_url: ConfigValue<String>,
    pub collection: ConfigValue<String>,
    pub max_cloud_cover: ConfigValue<f64>,
    pub preview_asset: ConfigValue<String>,
    pub request_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            catalog_url: ConfigValue::new(DEFAULT_CATALOG_URL.to_string(), ConfigSource::Default),
            collection: ConfigValue::new(DEFAULT_COLLECTION.to_string(), ConfigSource::Default),
            max_cloud_cover: ConfigValue::new(DEFAULT_MAX_CLOUD_COVER, ConfigSource::Default),
            preview_asset: ConfigValue::new(
                DEFAULT_PREVIEW_ASSET.to_string(),
                ConfigSource::Default,
            ),
            request_timeout_secs: ConfigValue::new(
                DEFAULT_REQUEST_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeostacError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeostacError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(catalog_url) = file_config.catalog_url {
            self.catalog_url.update(catalog_url, ConfigSource::File);
        }

        if let Some(collection) = file_config.collection {
            self.collection.update(collection, ConfigSource::File);
        }

        if let Some(max_cloud_cover) = file_config.max_cloud_cover {
            self.max_cloud_cover
                .update(validate_cloud_cover(max_cloud_cover)?, ConfigSource::File);
        }

        if let Some(preview_asset) = file_config.preview_asset {
            self.preview_asset.update(preview_asset, ConfigSource::File);
        }

        if let Some(timeout) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(timeout, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOSTAC_CATALOG_URL
        if let Ok(url) = env::var("GEOSTAC_CATALOG_URL") {
            if url.trim().is_empty() {
                tracing::warn!("Ignoring empty GEOSTAC_CATALOG_URL");
            } else {
                self.catalog_url.update(url, ConfigSource::Environment);
            }
        }

        // GEOSTAC_COLLECTION
        if let Ok(collection) = env::var("GEOSTAC_COLLECTION") {
            self.collection.update(collection, ConfigSource::Environment);
        }

        // GEOSTAC_MAX_CLOUD_COVER
        if let Ok(cover_str) = env::var("GEOSTAC_MAX_CLOUD_COVER") {
            match parse_cloud_cover(&cover_str) {
                Ok(cover) => self.max_cloud_cover.update(cover, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOSTAC_MAX_CLOUD_COVER value '{}': expected a percentage in (0, 100]",
                    cover_str
                ),
            }
        }

        // GEOSTAC_PREVIEW_ASSET
        if let Ok(asset) = env::var("GEOSTAC_PREVIEW_ASSET") {
            self.preview_asset.update(asset, ConfigSource::Environment);
        }

        // GEOSTAC_REQUEST_TIMEOUT
        if let Ok(timeout_str) = env::var("GEOSTAC_REQUEST_TIMEOUT") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) if timeout > 0 => {
                    self.request_timeout_secs.update(timeout, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOSTAC_REQUEST_TIMEOUT value '{}': expected seconds > 0",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(catalog_url) = overrides.catalog_url {
            self.catalog_url.update(catalog_url, ConfigSource::Cli);
        }

        if let Some(collection) = overrides.collection {
            self.collection.update(collection, ConfigSource::Cli);
        }

        if let Some(max_cloud_cover) = overrides.max_cloud_cover {
            self.max_cloud_cover.update(max_cloud_cover, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "catalog_url".to_string(),
            (self.catalog_url.value.clone(), self.catalog_url.source),
        );
        map.insert(
            "collection".to_string(),
            (self.collection.value.clone(), self.collection.source),
        );
        map.insert(
            "max_cloud_cover".to_string(),
            (format!("{}%", self.max_cloud_cover.value), self.max_cloud_cover.source),
        );
        map.insert(
            "preview_asset".to_string(),
            (self.preview_asset.value.clone(), self.preview_asset.source),
        );
        map.insert(
            "request_timeout_secs".to_string(),
            (self.request_timeout_secs.value.to_string(), self.request_timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    catalog_url: Option<String>,
    collection: Option<String>,
    max_cloud_cover: Option<f64>,
    preview_asset: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub catalog_url: Option<String>,
    pub collection: Option<String>,
    pub max_cloud_cover: Option<f64>,
}

/// Parse a cloud-cover ceiling percentage
pub fn parse_cloud_cover(s: &str) -> Result<f64> {
    let value: f64 = s.trim().parse().map_err(|_| GeostacError::ConfigInvalid {
        key: "max_cloud_cover".to_string(),
        reason: format!("'{}' is not a number", s),
    })?;

    validate_cloud_cover(value)
}

/// Check that a cloud-cover ceiling lies in `(0, 100]`
pub fn validate_cloud_cover(value: f64) -> Result<f64> {
    if !(value > 0.0 && value <= 100.0) {
        return Err(GeostacError::ConfigInvalid {
            key: "max_cloud_cover".to_string(),
            reason: format!("{} is outside (0, 100]", value),
        });
    }

    Ok(value)
}
