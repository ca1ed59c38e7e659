//! Runs the `geostac` binary against the in-memory store

use serde_json::Value;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 7] = [
    "GEOSTAC_CONFIG",
    "GEOSTAC_CATALOG_URL",
    "GEOSTAC_COLLECTION",
    "GEOSTAC_MAX_CLOUD_COVER",
    "GEOSTAC_PREVIEW_ASSET",
    "GEOSTAC_REQUEST_TIMEOUT",
    "DATABASE_URL",
];

fn geostac(args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_geostac"));
    for key in ENV_KEYS {
        command.env_remove(key);
    }
    command.env("RUST_LOG", "error");
    command.args(args).output().expect("Failed to execute geostac")
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

fn feature_file(features: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"type": "FeatureCollection", "features": [{}]}}"#, features).unwrap();
    file
}

fn square(name: &str, x: f64) -> String {
    format!(
        r#"{{"type": "Feature", "properties": {{"name": "{}"}},
            "geometry": {{"type": "Polygon",
            "coordinates": [[[{x}, 0], [{x1}, 0], [{x1}, 1], [{x}, 1], [{x}, 0]]]}}}}"#,
        name,
        x = x,
        x1 = x + 1.0
    )
}

#[test]
fn test_insert_reports_new_fields() {
    let file = feature_file(&format!("{}, {}", square("a", 0.0), square("a", 5.0)));
    let output = geostac(&["insert", file.path().to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let parsed = stdout_json(&output);
    assert_eq!(parsed["status"], "success");

    let fields = parsed["data"].as_array().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["name"], "a");
    assert_eq!(fields[0]["geom"], "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
    assert_eq!(fields[0]["image_url"], Value::Null);
}

#[test]
fn test_list_on_fresh_memory_store_is_empty() {
    let output = geostac(&["list", "--json"]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["data"], serde_json::json!([]));
}

#[test]
fn test_reconcile_with_unreachable_catalog_reports_lookup_failure() {
    let file = feature_file(&square("north", 0.0));
    let output = geostac(&[
        "reconcile",
        file.path().to_str().unwrap(),
        "--report",
        "--catalog-url",
        "http://127.0.0.1:9",
        "--json",
    ]);

    assert!(output.status.success());
    let parsed = stdout_json(&output);
    assert_eq!(parsed["data"]["lookup_failures"], 1);
    assert_eq!(parsed["data"]["created"], 0);
    assert_eq!(parsed["data"]["outcomes"][0]["status"], "lookup_failed");
    assert_eq!(parsed["data"]["outcomes"][0]["name"], "north");
}

#[test]
fn test_db_health_memory() {
    let output = geostac(&["db", "health", "--json"]);

    assert!(output.status.success());
    let parsed = stdout_json(&output);
    assert_eq!(parsed["data"]["backend"], "memory");
    assert_eq!(parsed["data"]["database"], true);
}

#[test]
fn test_postgres_without_database_url_fails() {
    let output = geostac(&["list", "--storage", "postgres"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DATABASE_URL"));
}

#[test]
fn test_config_shows_cli_override() {
    let output = geostac(&["config", "--max-cloud-cover", "25", "--json"]);

    assert!(output.status.success());
    let entries = stdout_json(&output)["data"].as_array().unwrap().clone();
    let cloud = entries.iter().find(|e| e["key"] == "max_cloud_cover").unwrap();
    assert_eq!(cloud["value"], "25%");
    assert_eq!(cloud["source"], "Cli");

    let collection = entries.iter().find(|e| e["key"] == "collection").unwrap();
    assert_eq!(collection["value"], "sentinel-2-l2a");
    assert_eq!(collection["source"], "Default");
}

#[test]
fn test_config_file_is_applied() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "collection = \"landsat-c2-l2\"").unwrap();

    let output = geostac(&["config", "--config", file.path().to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let entries = stdout_json(&output)["data"].as_array().unwrap().clone();
    let collection = entries.iter().find(|e| e["key"] == "collection").unwrap();
    assert_eq!(collection["value"], "landsat-c2-l2");
    assert_eq!(collection["source"], "File");
}

#[test]
fn test_invalid_feature_file_fails() {
    let file = feature_file(
        r#"{"type": "Feature", "properties": {},
            "geometry": {"type": "Point", "coordinates": [0, 0]}}"#,
    );
    let output = geostac(&["insert", file.path().to_str().unwrap()]);

    assert!(!output.status.success());
}
