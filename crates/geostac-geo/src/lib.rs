//! GeoSTAC Geo - Polygon encoding and spatial predicates
//!
//! This crate converts GeoJSON polygon rings into canonical WKT, validates
//! rings, and evaluates the equality and intersection predicates the field
//! store relies on.

pub mod codec;
pub mod spatial;
pub mod validation;

pub use codec::{
    canonical_wkt, extract_feature_info, parse_polygon, parse_rings, polygon_to_wkt,
    search_geometry, FeatureInfo,
};
