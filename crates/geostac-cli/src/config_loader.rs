//! Configuration loading utilities for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use geostac_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::PathBuf;

/// Config file named on the command line, else in `GEOSTAC_CONFIG`
pub fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config
        .clone()
        .or_else(|| {
            std::env::var("GEOSTAC_CONFIG")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
        })
}

/// Load layered catalog configuration: defaults, file, environment, then flags
pub fn load_catalog_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(cli) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        catalog_url: cli.catalog_url.clone(),
        collection: cli.collection.clone(),
        max_cloud_cover: cli.max_cloud_cover,
    });

    Ok(config)
}
