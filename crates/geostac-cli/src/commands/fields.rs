//! Insert, list and intersect commands

use crate::cli::{Cli, FileArgs, StorageBackend};
use crate::commands::{build_catalog, read_features};
use crate::output::OutputWriter;
use crate::output_types::FieldRow;
use crate::storage;
use anyhow::{Context, Result};
use geostac_core::models::Field;
use geostac_reconcile::{FieldQuery, ReconciliationEngine};

pub async fn insert(args: &FileArgs, cli: &Cli, output: &OutputWriter) -> Result<()> {
    let features = read_features(&args.file)?;
    let store = storage::open(cli.storage).await?;
    // The catalog is never queried on this path
    let engine = ReconciliationEngine::new(store, build_catalog(cli)?);

    let report = engine.insert_only(&features).await.context("Failed to insert fields")?;
    let conflicts = report.conflicts();
    let fields = report.into_fields();

    print_fields(&fields, output)?;
    if !output.is_json() {
        output.success(format!(
            "Inserted {} field(s), {} already present",
            fields.len(),
            conflicts
        ));
    }

    Ok(())
}

pub async fn list(backend: StorageBackend, output: &OutputWriter) -> Result<()> {
    let store = storage::open(backend).await?;
    let fields = FieldQuery::new(store).all().await.context("Failed to list fields")?;

    output.section(format!("Fields ({})", fields.len()));
    print_fields(&fields, output)
}

pub async fn intersect(
    args: &FileArgs,
    backend: StorageBackend,
    output: &OutputWriter,
) -> Result<()> {
    let features = read_features(&args.file)?;
    let store = storage::open(backend).await?;

    let fields = FieldQuery::new(store)
        .intersecting(&features)
        .await
        .context("Failed to query intersecting fields")?;

    if features.len() > 1 {
        output.warning("Only the first feature of the file is used for the intersection");
    }
    output.section(format!("Intersecting fields ({})", fields.len()));
    print_fields(&fields, output)
}

fn print_fields(fields: &[Field], output: &OutputWriter) -> Result<()> {
    let rows: Vec<FieldRow> = fields.iter().map(FieldRow::from).collect();
    output.table(rows, fields)
}
