//! Error types for GeoStac

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeostacError {
    // Validation errors
    #[error("Polygon ring is empty: at least one coordinate pair is required")]
    EmptyRing,

    #[error("Invalid geometry for feature '{feature}': {reason}")]
    InvalidGeometry { feature: String, reason: String },

    #[error("Request contains no features")]
    EmptyBatch,

    // Remote catalog errors
    #[error("Imagery catalog unavailable: {reason}. Try: {remediation}")]
    CatalogUnavailable { reason: String, remediation: String },

    // Store errors
    #[error("Store error: {0}")]
    Store(String),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

impl GeostacError {
    /// Whether this error was caused by malformed client input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GeostacError::EmptyRing
                | GeostacError::InvalidGeometry { .. }
                | GeostacError::EmptyBatch
        )
    }
}

pub type Result<T> = std::result::Result<T, GeostacError>;
