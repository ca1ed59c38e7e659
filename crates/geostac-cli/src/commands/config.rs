use crate::cli::Cli;
use crate::config_loader::{config_path, load_catalog_config};
use crate::output::OutputWriter;
use crate::output_types::ConfigEntry;
use anyhow::Result;

/// Show the resolved catalog configuration
pub fn execute(cli: &Cli, output: &OutputWriter) -> Result<()> {
    let config = load_catalog_config(cli)?;

    let mut entries: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry { key, value, source: format!("{:?}", source) })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    if let Some(path) = config_path(cli) {
        output.kv("Config file", path.display());
    }
    output.section("Catalog configuration");

    let json = serde_json::to_value(&entries)?;
    output.table(entries, json)
}
