use geojson::FeatureCollection;
use geostac_core::models::{features_from_collection, PolygonFeature};

use crate::error::ApiError;

/// Polygon features of a request body, in submission order
#[derive(Debug, Clone)]
pub struct FeatureBatch(pub Vec<PolygonFeature>);

impl TryFrom<FeatureCollection> for FeatureBatch {
    type Error = ApiError;

    fn try_from(collection: FeatureCollection) -> Result<Self, Self::Error> {
        Ok(Self(features_from_collection(collection)?))
    }
}
