use std::sync::Arc;

use geostac_core::error::{GeostacError, Result};
use geostac_core::models::{Field, PolygonFeature};
use geostac_geo::codec::extract_feature_info;
use geostac_store::FieldStore;

/// Read-only lookups over stored fields
pub struct FieldQuery {
    store: Arc<dyn FieldStore>,
}

impl FieldQuery {
    pub fn new(store: Arc<dyn FieldStore>) -> Self {
        Self { store }
    }

    /// Fields intersecting the polygon of the first feature.
    ///
    /// Any further features in the batch are ignored.
    pub async fn intersecting(&self, features: &[PolygonFeature]) -> Result<Vec<Field>> {
        let first = features.first().ok_or(GeostacError::EmptyBatch)?;
        if features.len() > 1 {
            tracing::debug!(ignored = features.len() - 1, "Only the first polygon is queried");
        }

        let info = extract_feature_info(first)?;
        let fields = self.store.find_intersecting(&info.wkt).await?;

        tracing::info!(feature = %info.name, matches = fields.len(), "Intersection query");
        Ok(fields)
    }

    /// Every stored field, ordered by id
    pub async fn all(&self) -> Result<Vec<Field>> {
        self.store.list_all().await
    }
}
