//! Create/update/skip reconciliation of incoming polygons.
//!
//! Features are processed one at a time in input order, so a later feature
//! sees the writes of an earlier one in the same batch. Each write is its own
//! store transaction; nothing spans the whole batch.

use std::sync::Arc;

use geostac_core::error::{GeostacError, Result};
use geostac_core::models::{Imagery, Insertion, NewField, PolygonFeature};
use geostac_geo::codec::{extract_feature_info, search_geometry, FeatureInfo};
use geostac_stac::ImageryCatalog;
use geostac_store::FieldStore;

use crate::models::{FeatureOutcome, InsertOutcome, InsertReport, ReconcileReport};

/// Result of asking the catalog for imagery
enum Lookup {
    Found(Option<Imagery>),
    Failed(String),
}

/// Orchestrates the field store and the imagery catalog
pub struct ReconciliationEngine {
    store: Arc<dyn FieldStore>,
    catalog: Arc<dyn ImageryCatalog>,
}

impl ReconciliationEngine {
    /// Create a new engine
    pub fn new(store: Arc<dyn FieldStore>, catalog: Arc<dyn ImageryCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Reconcile a batch against the store, enriching fields that lack imagery
    ///
    /// The whole batch is validated before anything is written. A catalog
    /// failure only affects its own feature; any other store failure aborts
    /// the remaining features.
    pub async fn reconcile(&self, features: &[PolygonFeature]) -> Result<ReconcileReport> {
        let infos = normalize_batch(features)?;
        let mut report = ReconcileReport { outcomes: Vec::with_capacity(infos.len()) };

        for info in &infos {
            let outcome = self.reconcile_one(info).await?;
            tracing::debug!(feature = %info.name, status = outcome.status(), "Feature reconciled");
            report.outcomes.push(outcome);
        }

        let summary = report.summary();
        tracing::info!(
            features = infos.len(),
            created = summary.created,
            updated = summary.updated,
            already_enriched = summary.already_enriched,
            conflicts = summary.conflicts,
            lookup_failures = summary.lookup_failures,
            "Reconciled batch"
        );

        Ok(report)
    }

    /// Insert every feature as a new field, without matching or enrichment
    pub async fn insert_only(&self, features: &[PolygonFeature]) -> Result<InsertReport> {
        let infos = normalize_batch(features)?;
        let mut report = InsertReport { outcomes: Vec::with_capacity(infos.len()) };

        for info in infos {
            let outcome = match self.store.insert(&NewField::new(info.name, info.wkt)).await? {
                Insertion::Inserted(field) => InsertOutcome::Inserted(field),
                Insertion::Conflict { name } => {
                    tracing::info!(feature = %name, "Field name already exists, skipping");
                    InsertOutcome::Conflict { name }
                }
            };
            report.outcomes.push(outcome);
        }

        tracing::info!(
            inserted = report.outcomes.len() - report.conflicts(),
            conflicts = report.conflicts(),
            "Inserted batch"
        );

        Ok(report)
    }

    async fn reconcile_one(&self, info: &FeatureInfo) -> Result<FeatureOutcome> {
        match self.store.find_exact(&info.wkt).await? {
            Some(existing) if existing.has_imagery() => {
                Ok(FeatureOutcome::AlreadyEnriched(existing))
            }
            Some(existing) => match self.lookup(info).await? {
                Lookup::Failed(reason) => Ok(lookup_failed(info, reason)),
                // Nothing to write: both imagery columns stay empty
                Lookup::Found(None) => Ok(FeatureOutcome::Updated(existing)),
                Lookup::Found(Some(imagery)) => {
                    let updated = self.store.update_imagery(existing.id, &imagery).await?;
                    Ok(FeatureOutcome::Updated(updated))
                }
            },
            None => {
                let imagery = match self.lookup(info).await? {
                    Lookup::Failed(reason) => return Ok(lookup_failed(info, reason)),
                    Lookup::Found(imagery) => imagery,
                };

                let new_field = NewField::new(&info.name, &info.wkt).with_imagery(imagery);
                match self.store.insert(&new_field).await? {
                    Insertion::Inserted(field) => Ok(FeatureOutcome::Created(field)),
                    Insertion::Conflict { name } => {
                        tracing::info!(feature = %name, "Field name already exists, skipping");
                        Ok(FeatureOutcome::Conflict { name })
                    }
                }
            }
        }
    }

    async fn lookup(&self, info: &FeatureInfo) -> Result<Lookup> {
        match self.catalog.newest_image(&search_geometry(info)).await {
            Ok(imagery) => {
                if imagery.is_none() {
                    tracing::info!(
                        feature = %info.name,
                        collection = self.catalog.collection(),
                        "No qualifying satellite image"
                    );
                }
                Ok(Lookup::Found(imagery))
            }
            Err(GeostacError::CatalogUnavailable { reason, .. }) => Ok(Lookup::Failed(reason)),
            Err(e) => Err(e),
        }
    }
}

fn lookup_failed(info: &FeatureInfo, reason: String) -> FeatureOutcome {
    tracing::warn!(feature = %info.name, reason = %reason, "Imagery lookup failed");
    FeatureOutcome::LookupFailed { name: info.name.clone(), reason }
}

/// Validate and normalise every feature before any write happens
pub(crate) fn normalize_batch(features: &[PolygonFeature]) -> Result<Vec<FeatureInfo>> {
    features.iter().map(extract_feature_info).collect()
}
