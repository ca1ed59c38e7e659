//! Conversion between polygon rings, GeoJSON features, and canonical WKT.
//!
//! The canonical text form is `POLYGON ((x1 y1, x2 y2, ...))` with every
//! ordinate printed in its shortest round-trip decimal form, so `1.0`
//! becomes `1`. Rings are emitted exactly as given: no closure repair and no
//! winding normalisation.

use std::fmt::Write as _;
use std::str::FromStr;

use geo::{BoundingRect, LineString};
use geojson::{Geometry, Value};
use geostac_core::error::{GeostacError, Result};
use geostac_core::models::{PolygonFeature, Ring};

/// Name given to features without a `name` property
pub const DEFAULT_FEATURE_NAME: &str = "Unknown";

/// Normalised view of an incoming feature
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInfo {
    pub name: String,
    /// The feature's geometry as submitted
    pub geometry: Geometry,
    /// Canonical WKT of the outer ring
    pub wkt: String,
    /// Outer ring used to build `wkt`
    pub ring: Ring,
}

/// Convert an ordered ring of `[lon, lat]` pairs into canonical polygon WKT.
///
/// An empty ring is rejected with [`GeostacError::EmptyRing`].
pub fn polygon_to_wkt(ring: &[[f64; 2]]) -> Result<String> {
    if ring.is_empty() {
        return Err(GeostacError::EmptyRing);
    }

    let mut text = String::from("POLYGON (");
    write_ring(&mut text, ring);
    text.push(')');
    Ok(text)
}

/// Extract the name, raw geometry and canonical WKT of a feature
pub fn extract_feature_info(feature: &PolygonFeature) -> Result<FeatureInfo> {
    let name = feature.name().unwrap_or_else(|| DEFAULT_FEATURE_NAME.to_string());
    let ring = feature.outer_ring()?;
    let wkt = polygon_to_wkt(&ring)?;

    Ok(FeatureInfo {
        name,
        geometry: feature.geometry.clone(),
        wkt,
        ring,
    })
}

/// GeoJSON polygon sent to the imagery catalog: outer ring only, 2-D, with a bbox
pub fn search_geometry(info: &FeatureInfo) -> Geometry {
    let positions = info.ring.iter().map(|[x, y]| vec![*x, *y]).collect();
    let mut geometry = Geometry::new(Value::Polygon(vec![positions]));

    let line: LineString<f64> = info.ring.iter().map(|[x, y]| (*x, *y)).collect();
    geometry.bbox = line
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

    geometry
}

/// Parse polygon WKT into its raw rings, without closing or reordering them
pub fn parse_rings(text: &str) -> Result<Vec<Ring>> {
    let parsed = wkt::Wkt::<f64>::from_str(text).map_err(|e| GeostacError::InvalidGeometry {
        feature: text.to_string(),
        reason: format!("Failed to parse WKT: {}", e),
    })?;

    match parsed {
        wkt::Wkt::Polygon(polygon) => Ok(polygon
            .0
            .into_iter()
            .map(|line| line.0.into_iter().map(|c| [c.x, c.y]).collect())
            .collect()),
        _ => Err(GeostacError::InvalidGeometry {
            feature: text.to_string(),
            reason: "expected POLYGON".to_string(),
        }),
    }
}

/// Parse polygon WKT into a `geo` polygon
pub fn parse_polygon(text: &str) -> Result<geo::Polygon<f64>> {
    let mut rings = parse_rings(text)?.into_iter().map(ring_to_line_string);

    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Ok(geo::Polygon::new(exterior, rings.collect()))
}

/// Re-emit any polygon WKT in canonical form
pub fn canonical_wkt(text: &str) -> Result<String> {
    let rings = parse_rings(text)?;
    if rings.iter().all(|ring| ring.is_empty()) {
        return Err(GeostacError::EmptyRing);
    }

    let mut out = String::from("POLYGON (");
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_ring(&mut out, ring);
    }
    out.push(')');
    Ok(out)
}

fn write_ring(out: &mut String, ring: &[[f64; 2]]) {
    out.push('(');
    for (i, [x, y]) in ring.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing to a String cannot fail
        let _ = write!(out, "{} {}", x, y);
    }
    out.push(')');
}

fn ring_to_line_string(ring: Ring) -> LineString<f64> {
    ring.into_iter().map(|[x, y]| (x, y)).collect()
}
