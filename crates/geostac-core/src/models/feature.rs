//! Incoming GeoJSON polygon features.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::error::{GeostacError, Result};

/// Ordered ring of `[lon, lat]` pairs
pub type Ring = Vec<[f64; 2]>;

/// A request feature whose geometry is known to be a polygon
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub properties: JsonObject,
    pub geometry: Geometry,
}

impl PolygonFeature {
    /// Build a single-ring polygon feature
    pub fn new(properties: JsonObject, ring: Ring) -> Self {
        let ring = ring.into_iter().map(|[x, y]| vec![x, y]).collect();
        Self {
            properties,
            geometry: Geometry::new(Value::Polygon(vec![ring])),
        }
    }

    /// Build a single-ring polygon feature carrying only a `name` property
    pub fn named(name: impl Into<String>, ring: Ring) -> Self {
        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), serde_json::Value::String(name.into()));
        Self::new(properties, ring)
    }

    /// The `name` property, if present
    ///
    /// String values are returned verbatim and `null` counts as absent; any
    /// other JSON value is rendered as JSON text.
    pub fn name(&self) -> Option<String> {
        name_property(&self.properties)
    }

    /// The outer ring as 2-D positions.
    ///
    /// Interior rings are ignored and extra ordinates are dropped. A polygon
    /// with no rings yields an empty ring.
    pub fn outer_ring(&self) -> Result<Ring> {
        let Value::Polygon(rings) = &self.geometry.value else {
            return Err(self.invalid(format!(
                "expected Polygon geometry, found {}",
                geometry_kind(&self.geometry.value)
            )));
        };

        let Some(outer) = rings.first() else {
            return Ok(Vec::new());
        };

        outer
            .iter()
            .enumerate()
            .map(|(i, position)| match position.as_slice() {
                [x, y, ..] => Ok([*x, *y]),
                _ => Err(self.invalid(format!(
                    "position {} has {} ordinate(s), expected at least 2",
                    i,
                    position.len()
                ))),
            })
            .collect()
    }

    fn invalid(&self, reason: String) -> GeostacError {
        GeostacError::InvalidGeometry {
            feature: display_name(&self.properties),
            reason,
        }
    }
}

impl TryFrom<Feature> for PolygonFeature {
    type Error = GeostacError;

    fn try_from(feature: Feature) -> Result<Self> {
        let properties = feature.properties.unwrap_or_default();

        let Some(geometry) = feature.geometry else {
            return Err(GeostacError::InvalidGeometry {
                feature: display_name(&properties),
                reason: "feature has no geometry".to_string(),
            });
        };

        if !matches!(geometry.value, Value::Polygon(_)) {
            return Err(GeostacError::InvalidGeometry {
                feature: display_name(&properties),
                reason: format!(
                    "expected Polygon geometry, found {}",
                    geometry_kind(&geometry.value)
                ),
            });
        }

        Ok(Self { properties, geometry })
    }
}

/// Convert every feature of a collection, failing on the first non-polygon
pub fn features_from_collection(collection: FeatureCollection) -> Result<Vec<PolygonFeature>> {
    collection.features.into_iter().map(PolygonFeature::try_from).collect()
}

fn name_property(properties: &JsonObject) -> Option<String> {
    match properties.get("name")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn display_name(properties: &JsonObject) -> String {
    name_property(properties).unwrap_or_else(|| "Unknown".to_string())
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
