use geostac_core::models::Field;
use geostac_reconcile::FeatureOutcome;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub database: bool,
}

impl HealthResponse {
    pub fn new(database: bool) -> Self {
        Self {
            status: if database { "ok" } else { "degraded" },
            service: "geostac-api",
            database,
        }
    }
}

/// One entry of a reconcile report
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub status: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&FeatureOutcome> for OutcomeResponse {
    fn from(outcome: &FeatureOutcome) -> Self {
        Self {
            status: outcome.status(),
            name: outcome.name().to_string(),
            field: outcome.field().cloned(),
            reason: outcome.reason().map(str::to_string),
        }
    }
}
