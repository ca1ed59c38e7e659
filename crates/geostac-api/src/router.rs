use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let geo = Router::new()
        .route("/satellite-image", post(handlers::satellite_image))
        .route("/satellite-image/report", post(handlers::satellite_image_report))
        .route("/fields", post(handlers::create_fields).get(handlers::list_fields))
        .route("/fields-intersect", post(handlers::fields_intersect));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1/geo", geo)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy allowing a single browser origin
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}
