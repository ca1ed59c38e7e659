use crate::cli::{Cli, ReconcileArgs};
use crate::commands::{build_catalog, read_features};
use crate::output::OutputWriter;
use crate::output_types::{FieldRow, OutcomeOutput, OutcomeRow, ReportOutput};
use crate::storage;
use anyhow::{Context, Result};
use geostac_reconcile::ReconciliationEngine;

/// Store new fields and fill in missing imagery
pub async fn execute(args: &ReconcileArgs, cli: &Cli, output: &OutputWriter) -> Result<()> {
    let features = read_features(&args.file)?;
    let store = storage::open(cli.storage).await?;
    let catalog = build_catalog(cli)?;
    let engine = ReconciliationEngine::new(store, catalog);

    output.info(format!("Reconciling {} feature(s)", features.len()));
    let report = engine.reconcile(&features).await.context("Failed to reconcile fields")?;
    let summary = report.summary();

    if args.report {
        let rows: Vec<OutcomeRow> = report.outcomes.iter().map(OutcomeRow::from).collect();
        let outcomes: Vec<OutcomeOutput> =
            report.outcomes.iter().map(OutcomeOutput::from).collect();
        output.table(rows, ReportOutput::new(summary, outcomes))?;
    } else {
        let fields = report.into_fields();
        let rows: Vec<FieldRow> = fields.iter().map(FieldRow::from).collect();
        output.table(rows, &fields)?;
    }

    if !output.is_json() {
        output.success(format!(
            "{} created, {} updated, {} already enriched",
            summary.created, summary.updated, summary.already_enriched
        ));
    }
    if summary.conflicts > 0 {
        output.warning(format!("{} feature(s) skipped: name already exists", summary.conflicts));
    }
    if summary.lookup_failures > 0 {
        output.warning(format!(
            "{} feature(s) skipped: imagery catalog unavailable",
            summary.lookup_failures
        ));
    }

    Ok(())
}
