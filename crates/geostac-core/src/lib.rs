//! GeoStac Core - Domain models, errors, and configuration
//!
//! This crate contains the types shared by every other GeoStac crate: the
//! field record, incoming polygon features, the error taxonomy, and the
//! layered catalog configuration.

pub mod config;
pub mod error;
pub mod models;

pub use error::{GeostacError, Result};
