use geostac_core::error::{GeostacError, Result};
use geostac_core::models::Ring;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// Convert into a `Result`, reporting the first error against `feature`
    pub fn into_result(self, feature: &str) -> Result<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(error) => Err(GeostacError::InvalidGeometry {
                feature: feature.to_string(),
                reason: format!("{}: {}", error.location, error.reason),
            }),
        }
    }
}

/// Validate the rings of a polygon the way a spatial database would on insert
pub fn validate_rings(rings: &[Ring]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if rings.is_empty() {
        result.add_error("Polygon".to_string(), "Polygon has no rings".to_string());
        return result;
    }

    for (i, ring) in rings.iter().enumerate() {
        let location = if i == 0 {
            "Polygon exterior".to_string()
        } else {
            format!("Polygon interior[{}]", i - 1)
        };
        validate_ring_into(ring, &location, &mut result);
    }

    result
}

fn validate_ring_into(ring: &[[f64; 2]], location: &str, result: &mut ValidationResult) {
    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    for (i, [x, y]) in ring.iter().enumerate() {
        if !x.is_finite() || !y.is_finite() {
            result.add_error(
                format!("{}[{}]", location, i),
                "Coordinates must be finite".to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_rings;

    fn exterior(ring: &[[f64; 2]]) -> ValidationResult {
        validate_rings(&[ring.to_vec()])
    }

    #[test]
    fn test_closed_ring_is_valid() {
        let ring = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        assert!(exterior(&ring).is_valid);
    }

    #[test]
    fn test_unclosed_ring_is_invalid() {
        let ring = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let result = exterior(&ring);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].location, "Polygon exterior");
        assert!(result.errors[0].reason.contains("closed"));
    }

    #[test]
    fn test_short_ring_is_invalid() {
        let ring = [[1.0, 2.0], [3.0, 4.0], [1.0, 2.0]];
        let result = exterior(&ring);
        assert!(!result.is_valid);
        assert!(result.errors[0].reason.contains("at least 4 points"));
    }

    #[test]
    fn test_non_finite_coordinates() {
        let ring = [[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0], [0.0, 0.0]];
        assert!(!exterior(&ring).is_valid);
    }

    #[test]
    fn test_no_rings_is_invalid() {
        assert!(!validate_rings(&[]).is_valid);
    }

    #[test]
    fn test_interior_ring_is_reported() {
        let rings = parse_rings("POLYGON ((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 2 2))").unwrap();
        let result = validate_rings(&rings);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.location == "Polygon interior[0]"));
    }

    #[test]
    fn test_into_result_names_feature() {
        let err = exterior(&[[0.0, 0.0]]).into_result("Plot 9").unwrap_err();
        match err {
            GeostacError::InvalidGeometry { feature, reason } => {
                assert_eq!(feature, "Plot 9");
                assert!(reason.starts_with("Polygon exterior: "));
            }
            other => panic!("Expected InvalidGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_into_result_valid() {
        let ring = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
        assert!(exterior(&ring).into_result("ok").is_ok());
    }
}
