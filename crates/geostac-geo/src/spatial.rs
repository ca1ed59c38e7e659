//! Spatial predicates used by the in-memory field store.
//!
//! Both predicates follow the DE-9IM semantics PostGIS uses for `ST_Equals`
//! and `ST_Intersects`: equality ignores vertex order and starting point,
//! and shared boundaries count as intersecting.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::intersects::Intersects;
use geo::algorithm::relate::Relate;
use geo::{Polygon, Rect};

/// Topological equality of two polygons
pub fn polygons_equal(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    // Cheap reject before building the full intersection matrix
    match (a.bounding_rect(), b.bounding_rect()) {
        (Some(ra), Some(rb)) if !rects_equal(&ra, &rb) => return false,
        _ => {}
    }
    a.relate(b).is_equal_topo()
}

/// True when the polygons share at least one point
pub fn polygons_intersect(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    a.intersects(b)
}

fn rects_equal(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min() == b.min() && a.max() == b.max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_polygon;

    fn poly(wkt: &str) -> Polygon<f64> {
        parse_polygon(wkt).unwrap()
    }

    #[test]
    fn test_identical_polygons_are_equal() {
        let a = poly("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        assert!(polygons_equal(&a, &a.clone()));
    }

    #[test]
    fn test_rotated_start_vertex_is_equal() {
        let a = poly("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = poly("POLYGON ((1 1, 0 1, 0 0, 1 0, 1 1))");
        assert!(polygons_equal(&a, &b));
    }

    #[test]
    fn test_reversed_orientation_is_equal() {
        let a = poly("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = poly("POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
        assert!(polygons_equal(&a, &b));
    }

    #[test]
    fn test_different_polygons_are_not_equal() {
        let a = poly("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = poly("POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))");
        assert!(!polygons_equal(&a, &b));
    }

    #[test]
    fn test_overlapping_polygons_intersect() {
        let a = poly("POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))");
        let b = poly("POLYGON ((1 1, 3 1, 3 3, 1 3, 1 1))");
        assert!(polygons_intersect(&a, &b));
    }

    #[test]
    fn test_edge_touching_polygons_intersect() {
        let a = poly("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = poly("POLYGON ((1 0, 2 0, 2 1, 1 1, 1 0))");
        assert!(polygons_intersect(&a, &b));
    }

    #[test]
    fn test_disjoint_polygons_do_not_intersect() {
        let a = poly("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = poly("POLYGON ((5 5, 6 5, 6 6, 5 6, 5 5))");
        assert!(!polygons_intersect(&a, &b));
    }
}
