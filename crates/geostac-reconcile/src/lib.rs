//! GeoSTAC Reconcile - Field reconciliation and queries
//!
//! This crate implements the use cases: the create/update/skip decision
//! for each incoming polygon, the insert-only path, and intersection queries.

pub mod engine;
pub mod models;
pub mod query;

pub use engine::ReconciliationEngine;
pub use models::{FeatureOutcome, InsertOutcome, InsertReport, ReconcileReport, ReportSummary};
pub use query::FieldQuery;
