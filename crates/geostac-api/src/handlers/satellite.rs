use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use geojson::FeatureCollection;
use geostac_core::models::Field;

use crate::dto::{FeatureBatch, OutcomeResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Reconcile the batch and return the created or updated fields
pub async fn satellite_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeatureCollection>, JsonRejection>,
) -> Result<Json<Vec<Field>>, ApiError> {
    let Json(collection) = payload?;
    let FeatureBatch(features) = FeatureBatch::try_from(collection)?;

    tracing::info!(features = features.len(), "Processing satellite image request");

    let report = state.engine.reconcile(&features).await?;
    Ok(Json(report.into_fields()))
}

/// Reconcile the batch and return one outcome per feature
pub async fn satellite_image_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeatureCollection>, JsonRejection>,
) -> Result<Json<Vec<OutcomeResponse>>, ApiError> {
    let Json(collection) = payload?;
    let FeatureBatch(features) = FeatureBatch::try_from(collection)?;

    tracing::info!(features = features.len(), "Processing satellite image report request");

    let report = state.engine.reconcile(&features).await?;
    Ok(Json(report.outcomes.iter().map(OutcomeResponse::from).collect()))
}
