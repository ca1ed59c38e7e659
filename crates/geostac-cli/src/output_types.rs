use geostac_core::models::Field;
use geostac_reconcile::{FeatureOutcome, ReportSummary};
use serde::Serialize;
use tabled::Tabled;

/// Table row for a stored field
#[derive(Debug, Tabled)]
pub struct FieldRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Image date")]
    pub image_date: String,
    #[tabled(rename = "Image URL")]
    pub image_url: String,
}

impl From<&Field> for FieldRow {
    fn from(field: &Field) -> Self {
        Self {
            id: field.id.0,
            name: field.name.clone(),
            image_date: field.image_date().unwrap_or("-").to_string(),
            image_url: field.image_url().map(shorten).unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Table row for one reconcile outcome
#[derive(Debug, Tabled)]
pub struct OutcomeRow {
    #[tabled(rename = "Status")]
    pub status: &'static str,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl From<&FeatureOutcome> for OutcomeRow {
    fn from(outcome: &FeatureOutcome) -> Self {
        let detail = match outcome.field() {
            Some(field) => field.image_date().unwrap_or("no image").to_string(),
            None => outcome.reason().unwrap_or_default().to_string(),
        };

        Self {
            status: outcome.status(),
            name: outcome.name().to_string(),
            field: outcome.field().map(|f| f.id.to_string()).unwrap_or_else(|| "-".to_string()),
            detail,
        }
    }
}

/// JSON shape of one reconcile outcome
#[derive(Debug, Serialize)]
pub struct OutcomeOutput {
    pub status: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&FeatureOutcome> for OutcomeOutput {
    fn from(outcome: &FeatureOutcome) -> Self {
        Self {
            status: outcome.status(),
            name: outcome.name().to_string(),
            field: outcome.field().cloned(),
            reason: outcome.reason().map(str::to_string),
        }
    }
}

/// JSON shape of a reconcile report
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub created: usize,
    pub updated: usize,
    pub already_enriched: usize,
    pub conflicts: usize,
    pub lookup_failures: usize,
    pub outcomes: Vec<OutcomeOutput>,
}

impl ReportOutput {
    pub fn new(summary: ReportSummary, outcomes: Vec<OutcomeOutput>) -> Self {
        Self {
            created: summary.created,
            updated: summary.updated,
            already_enriched: summary.already_enriched,
            conflicts: summary.conflicts,
            lookup_failures: summary.lookup_failures,
            outcomes,
        }
    }
}

/// Output for db health
#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub backend: String,
    pub database: bool,
}

/// Output for db init and db drop
#[derive(Debug, Serialize)]
pub struct SchemaOutput {
    pub backend: String,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub migrations: Vec<MigrationOutput>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct MigrationOutput {
    #[tabled(rename = "Version")]
    pub version: i64,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Applied")]
    pub applied: bool,
}

/// One resolved catalog setting
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// Long signed preview URLs are cut for the table view
fn shorten(url: &str) -> String {
    const MAX: usize = 60;
    if url.chars().count() <= MAX {
        return url.to_string();
    }
    let head: String = url.chars().take(MAX - 3).collect();
    format!("{}...", head)
}
