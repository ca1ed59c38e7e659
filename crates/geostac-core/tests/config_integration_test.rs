//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use geostac_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 5] = [
    "GEOSTAC_CATALOG_URL",
    "GEOSTAC_COLLECTION",
    "GEOSTAC_MAX_CLOUD_COVER",
    "GEOSTAC_PREVIEW_ASSET",
    "GEOSTAC_REQUEST_TIMEOUT",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file(
        r#"
collection = "landsat-c2-l2"
# Only override the collection, leave others as defaults
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.collection.value, "landsat-c2-l2");
    assert_eq!(config.collection.source, ConfigSource::File);
    assert_eq!(config.max_cloud_cover.value, 10.0);
    assert_eq!(config.max_cloud_cover.source, ConfigSource::Default);
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = config_file("catalog_url = [not toml");

    let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
fn test_missing_file_is_config_error() {
    let err = LayeredConfig::with_defaults()
        .load_from_file("/definitely/not/here/geostac.toml")
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("GEOSTAC_CATALOG_URL", "http://env-catalog/stac");
    env::set_var("GEOSTAC_MAX_CLOUD_COVER", "20");

    let file = config_file(
        r#"
catalog_url = "http://file-catalog/stac"
max_cloud_cover = 5.0
collection = "file-collection"
"#,
    );

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.catalog_url.value, "http://env-catalog/stac");
    assert_eq!(config.catalog_url.source, ConfigSource::Environment);
    assert_eq!(config.max_cloud_cover.value, 20.0);
    assert_eq!(config.max_cloud_cover.source, ConfigSource::Environment);
    // Not set in the environment, so the file wins
    assert_eq!(config.collection.value, "file-collection");
    assert_eq!(config.collection.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("GEOSTAC_MAX_CLOUD_COVER", "lots");
    env::set_var("GEOSTAC_REQUEST_TIMEOUT", "0");
    env::set_var("GEOSTAC_CATALOG_URL", "   ");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.max_cloud_cover.value, 10.0);
    assert_eq!(config.max_cloud_cover.source, ConfigSource::Default);
    assert_eq!(config.request_timeout_secs.source, ConfigSource::Default);
    assert_eq!(config.catalog_url.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_environment() {
    clear_env();
    env::set_var("GEOSTAC_MAX_CLOUD_COVER", "20");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        max_cloud_cover: Some(2.5),
        ..Default::default()
    });

    assert_eq!(config.max_cloud_cover.value, 2.5);
    assert_eq!(config.max_cloud_cover.source, ConfigSource::Cli);

    clear_env();
}
