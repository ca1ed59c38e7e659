//! GeoSTAC Store - Field storage port and adapters
//!
//! This crate defines the field store port and provides an in-memory
//! adapter for development and a PostGIS adapter for production.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryFieldStore;
pub use ports::FieldStore;
pub use postgres::{PostgresConfig, PostgresStore};
