use async_trait::async_trait;
use geostac_core::error::Result;
use geostac_core::models::{Field, FieldId, Imagery, Insertion, NewField};

/// Port for persisting fields and answering geometric lookups
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// Find the first field whose geometry is geometrically equal to `wkt`
    async fn find_exact(&self, wkt: &str) -> Result<Option<Field>>;

    /// Insert a new field in its own transaction
    ///
    /// A duplicate name is reported as [`Insertion::Conflict`], not as an error.
    async fn insert(&self, field: &NewField) -> Result<Insertion>;

    /// Set the imagery of an existing field and return the updated record
    async fn update_imagery(&self, id: FieldId, imagery: &Imagery) -> Result<Field>;

    /// All fields, ordered by id
    async fn list_all(&self) -> Result<Vec<Field>>;

    /// Fields whose geometry intersects `wkt`; shared boundaries count
    async fn find_intersecting(&self, wkt: &str) -> Result<Vec<Field>>;

    /// Create the field table (idempotent)
    async fn create_schema(&self) -> Result<()>;

    /// Drop the field table and every row in it
    async fn drop_schema(&self) -> Result<()>;

    /// Whether the store is reachable and its schema usable
    async fn health_check(&self) -> bool;
}
