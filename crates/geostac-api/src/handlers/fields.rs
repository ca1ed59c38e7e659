use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use geojson::FeatureCollection;
use geostac_core::models::Field;

use crate::dto::FeatureBatch;
use crate::error::ApiError;
use crate::state::AppState;

/// Insert every feature as a bare field; name conflicts are skipped
pub async fn create_fields(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeatureCollection>, JsonRejection>,
) -> Result<Json<Vec<Field>>, ApiError> {
    let Json(collection) = payload?;
    let FeatureBatch(features) = FeatureBatch::try_from(collection)?;

    tracing::info!(features = features.len(), "Processing insert request");

    let report = state.engine.insert_only(&features).await?;
    Ok(Json(report.into_fields()))
}

pub async fn list_fields(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Field>>, ApiError> {
    Ok(Json(state.query.all().await?))
}

/// Fields intersecting the first submitted polygon
pub async fn fields_intersect(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeatureCollection>, JsonRejection>,
) -> Result<Json<Vec<Field>>, ApiError> {
    let Json(collection) = payload?;
    let FeatureBatch(features) = FeatureBatch::try_from(collection)?;

    tracing::info!(features = features.len(), "Processing intersection request");

    Ok(Json(state.query.intersecting(&features).await?))
}
