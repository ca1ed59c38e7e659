//! In-memory field store for development and testing.
//!
//! This implementation uses `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use the PostgreSQL backend.

use async_trait::async_trait;
use geostac_core::error::{GeostacError, Result};
use geostac_core::models::{Field, FieldId, Imagery, Insertion, NewField};
use geostac_geo::codec::{canonical_wkt, parse_polygon, parse_rings};
use geostac_geo::spatial::{polygons_equal, polygons_intersect};
use geostac_geo::validation::validate_rings;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory implementation of FieldStore
///
/// Cloning shares the underlying rows.
#[derive(Debug, Clone)]
pub struct MemoryFieldStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug)]
struct MemoryState {
    rows: BTreeMap<FieldId, StoredField>,
    next_id: i64,
    schema_ready: bool,
}

#[derive(Debug, Clone)]
struct StoredField {
    field: Field,
    polygon: geo::Polygon<f64>,
}

impl Default for MemoryFieldStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFieldStore {
    /// Create a new in-memory store with its schema already in place
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                rows: BTreeMap::new(),
                next_id: 0,
                schema_ready: true,
            })),
        }
    }

    /// Number of stored fields
    pub fn len(&self) -> usize {
        self.state.read().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MemoryState {
    fn ensure_schema(&self) -> Result<()> {
        if self.schema_ready {
            Ok(())
        } else {
            Err(GeostacError::Store("relation \"geo_fields\" does not exist".to_string()))
        }
    }
}

/// Geometry the database would refuse surfaces as a store error
fn invalid_geometry(e: GeostacError) -> GeostacError {
    GeostacError::Store(format!("Invalid geometry: {}", e))
}

fn query_polygon(wkt: &str) -> Result<geo::Polygon<f64>> {
    parse_polygon(wkt).map_err(invalid_geometry)
}

#[async_trait]
impl crate::ports::FieldStore for MemoryFieldStore {
    async fn find_exact(&self, wkt: &str) -> Result<Option<Field>> {
        let state = self.state.read().unwrap();
        state.ensure_schema()?;

        let polygon = query_polygon(wkt)?;
        Ok(state
            .rows
            .values()
            .find(|stored| polygons_equal(&stored.polygon, &polygon))
            .map(|stored| stored.field.clone()))
    }

    async fn insert(&self, field: &NewField) -> Result<Insertion> {
        let mut state = self.state.write().unwrap();
        state.ensure_schema()?;

        let rings = parse_rings(&field.geom).map_err(invalid_geometry)?;
        validate_rings(&rings).into_result(&field.name).map_err(invalid_geometry)?;

        if state.rows.values().any(|stored| stored.field.name == field.name) {
            tracing::debug!(name = %field.name, "Duplicate field name, insert rolled back");
            return Ok(Insertion::Conflict { name: field.name.clone() });
        }

        let polygon = query_polygon(&field.geom)?;
        let geom = canonical_wkt(&field.geom).map_err(invalid_geometry)?;

        state.next_id += 1;
        let id = FieldId(state.next_id);
        let stored = Field {
            id,
            name: field.name.clone(),
            geom,
            imagery: field.imagery.clone(),
        };

        state.rows.insert(id, StoredField { field: stored.clone(), polygon });
        Ok(Insertion::Inserted(stored))
    }

    async fn update_imagery(&self, id: FieldId, imagery: &Imagery) -> Result<Field> {
        let mut state = self.state.write().unwrap();
        state.ensure_schema()?;

        let stored = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| GeostacError::Store(format!("Field {} not found", id)))?;

        stored.field.imagery = Some(imagery.clone());
        Ok(stored.field.clone())
    }

    async fn list_all(&self) -> Result<Vec<Field>> {
        let state = self.state.read().unwrap();
        state.ensure_schema()?;

        Ok(state.rows.values().map(|stored| stored.field.clone()).collect())
    }

    async fn find_intersecting(&self, wkt: &str) -> Result<Vec<Field>> {
        let state = self.state.read().unwrap();
        state.ensure_schema()?;

        let polygon = query_polygon(wkt)?;
        Ok(state
            .rows
            .values()
            .filter(|stored| polygons_intersect(&stored.polygon, &polygon))
            .map(|stored| stored.field.clone())
            .collect())
    }

    async fn create_schema(&self) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.schema_ready = true;
        Ok(())
    }

    async fn drop_schema(&self) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.rows.clear();
        state.next_id = 0;
        state.schema_ready = false;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let ready = self.state.read().unwrap().schema_ready;
        if !ready {
            tracing::warn!("Memory store health check failed: schema has been dropped");
        }
        ready
    }
}
