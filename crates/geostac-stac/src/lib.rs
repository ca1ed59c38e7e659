//! GeoSTAC STAC - Satellite imagery lookup
//!
//! This crate defines the imagery catalog port and a STAC API adapter
//! that finds the newest low-cloud scene covering a polygon.

pub mod client;
pub mod ports;

// Re-export main types
pub use client::{StacClient, StacConfig};
pub use ports::ImageryCatalog;
