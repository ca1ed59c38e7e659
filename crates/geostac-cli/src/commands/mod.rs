//! Command implementations

mod config;
mod db;
mod fields;
mod reconcile;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_catalog_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use geojson::FeatureCollection;
use geostac_core::models::{features_from_collection, PolygonFeature};
use geostac_stac::{ImageryCatalog, StacClient, StacConfig};
use std::path::Path;
use std::sync::Arc;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match &cli.command {
        Commands::Db(args) => db::execute(args, cli.storage, &output).await,
        Commands::Reconcile(args) => reconcile::execute(args, &cli, &output).await,
        Commands::Insert(args) => fields::insert(args, &cli, &output).await,
        Commands::List => fields::list(cli.storage, &output).await,
        Commands::Intersect(args) => fields::intersect(args, cli.storage, &output).await,
        Commands::Config => config::execute(&cli, &output),
    }
}

/// Read a GeoJSON FeatureCollection file into polygon features
pub(crate) fn read_features(path: &Path) -> Result<Vec<PolygonFeature>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let collection: FeatureCollection = text
        .parse()
        .with_context(|| format!("{} is not a GeoJSON FeatureCollection", path.display()))?;

    let features = features_from_collection(collection)
        .with_context(|| format!("Invalid feature in {}", path.display()))?;

    tracing::debug!(path = %path.display(), features = features.len(), "Read feature file");
    Ok(features)
}

/// Build the STAC client from the layered catalog configuration
pub(crate) fn build_catalog(cli: &Cli) -> Result<Arc<dyn ImageryCatalog>> {
    let config = load_catalog_config(cli)?;
    let stac = StacConfig::from_layered(&config);

    tracing::info!(
        catalog_url = %stac.base_url,
        collection = %stac.collection,
        max_cloud_cover = stac.max_cloud_cover,
        "Using imagery catalog"
    );

    let client = StacClient::new(stac).context("Failed to create imagery catalog client")?;
    Ok(Arc::new(client))
}
