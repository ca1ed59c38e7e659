use clap::{Parser, Subcommand};
use geostac_core::config::parse_cloud_cover;
use std::path::PathBuf;

/// GeoStac - field polygons enriched with satellite imagery
#[derive(Parser, Debug)]
#[command(name = "geostac")]
#[command(
    about = "Store GeoJSON field polygons and enrich them with the newest satellite scene",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage backend to use (memory or postgres)
    #[arg(long, global = true, default_value = "memory")]
    pub storage: StorageBackend,

    /// TOML file with imagery catalog settings (falls back to GEOSTAC_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// STAC API base URL
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// STAC collection to search
    #[arg(long, global = true)]
    pub collection: Option<String>,

    /// Cloud-cover ceiling in percent, exclusive
    #[arg(long, global = true, value_parser = parse_cloud_cover)]
    pub max_cloud_cover: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageBackend {
    /// In-memory storage, discarded when the command exits
    Memory,
    /// PostgreSQL with PostGIS, configured through DATABASE_URL
    Postgres,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the field table
    Db(DbArgs),

    /// Store new fields and attach the newest low-cloud image to each
    Reconcile(ReconcileArgs),

    /// Store new fields without imagery lookups
    Insert(FileArgs),

    /// List every stored field
    List,

    /// List stored fields intersecting the first feature of a file
    Intersect(FileArgs),

    /// Show the resolved catalog configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create the field table and its spatial index
    Init,

    /// Drop the field table
    Drop,

    /// Check that the store answers queries
    Health,
}

#[derive(Parser, Debug)]
pub struct FileArgs {
    /// GeoJSON FeatureCollection file
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// GeoJSON FeatureCollection file
    pub file: PathBuf,

    /// Print the per-feature outcome instead of the written fields
    #[arg(long)]
    pub report: bool,
}
