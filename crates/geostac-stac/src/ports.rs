//! Imagery catalog port definition

use async_trait::async_trait;
use geojson::Geometry;
use geostac_core::error::Result;
use geostac_core::models::Imagery;

/// Port for looking up satellite imagery over a geometry
#[async_trait]
pub trait ImageryCatalog: Send + Sync {
    /// Find the most recent qualifying scene intersecting `geometry`
    ///
    /// # Returns
    /// `Ok(None)` when the catalog has no scene under the cloud-cover ceiling.
    /// Transport and decoding failures are `GeostacError::CatalogUnavailable`.
    async fn newest_image(&self, geometry: &Geometry) -> Result<Option<Imagery>>;

    /// Identifier of the collection being searched
    fn collection(&self) -> &str;
}
