//! HTTP routes over the in-memory store and a fixed catalog

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use geojson::Geometry;
use geostac_api::{create_router, AppState};
use geostac_core::error::{GeostacError, Result};
use geostac_core::models::Imagery;
use geostac_stac::ImageryCatalog;
use geostac_store::{FieldStore, MemoryFieldStore};
use serde_json::{json, Value};
use tower::ServiceExt;

struct FixedCatalog {
    answer: Option<Imagery>,
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl ImageryCatalog for FixedCatalog {
    async fn newest_image(&self, _geometry: &Geometry) -> Result<Option<Imagery>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GeostacError::CatalogUnavailable {
                reason: "catalog down".to_string(),
                remediation: "try later".to_string(),
            });
        }
        Ok(self.answer.clone())
    }

    fn collection(&self) -> &str {
        "sentinel-2-l2a"
    }
}

fn app_with(store: MemoryFieldStore, catalog: FixedCatalog) -> (Router, Arc<FixedCatalog>) {
    let catalog = Arc::new(catalog);
    let state = Arc::new(AppState::new(Arc::new(store), catalog.clone()));
    (create_router(state), catalog)
}

fn app() -> (Router, Arc<FixedCatalog>) {
    app_with(
        MemoryFieldStore::new(),
        FixedCatalog {
            answer: Some(Imagery::new("mock_url", "mock_datetime")),
            fail: false,
            calls: AtomicUsize::new(0),
        },
    )
}

fn collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

fn polygon(name: Option<&str>, ring: Value) -> Value {
    let properties = match name {
        Some(name) => json!({"name": name}),
        None => json!({}),
    };
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": {"type": "Polygon", "coordinates": [ring]}
    })
}

fn rotterdam() -> Value {
    polygon(
        Some("Rotterdam"),
        json!([
            [4.369498592495802, 51.958455125061136],
            [4.373182175674373, 51.88121056902091],
            [4.581304625280353, 51.883484364969945],
            [4.581304625280353, 51.956185123200754],
            [4.369498592495802, 51.958455125061136]
        ]),
    )
}

fn square(name: &str, x: f64, y: f64) -> Value {
    polygon(
        Some(name),
        json!([[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value =
        if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[tokio::test]
async fn test_health_reports_database() {
    let store = MemoryFieldStore::new();
    let (app, _) = app_with(
        store.clone(),
        FixedCatalog { answer: None, fail: false, calls: AtomicUsize::new(0) },
    );

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "geostac-api", "database": true}));

    store.drop_schema().await.unwrap();
    let (_, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_satellite_image_end_to_end() {
    let (app, catalog) = app();
    let body = collection(vec![rotterdam()]);

    let (status, first) =
        send(&app, "POST", "/api/v1/geo/satellite-image", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.as_array().unwrap().len(), 1);
    assert_eq!(first[0]["name"], "Rotterdam");
    assert_eq!(first[0]["image_url"], "mock_url");
    assert_eq!(first[0]["image_date"], "mock_datetime");
    let geom = first[0]["geom"].as_str().unwrap();
    assert!(geom.starts_with("POLYGON ((4.369498592495802 51.958455125061136"));

    let (status, second) = send(&app, "POST", "/api/v1/geo/satellite-image", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, json!([]));
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);

    let (_, listed) = send(&app, "GET", "/api/v1/geo/fields", None).await;
    assert_eq!(listed[0]["image_url"], "mock_url");
}

#[tokio::test]
async fn test_satellite_image_report() {
    let (app, _) = app();
    send(&app, "POST", "/api/v1/geo/satellite-image", Some(collection(vec![square("a", 0.0, 0.0)])))
        .await;

    let body =
        collection(vec![square("a", 0.0, 0.0), square("a", 5.0, 5.0), square("b", 9.0, 9.0)]);
    let (status, report) =
        send(&app, "POST", "/api/v1/geo/satellite-image/report", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report[0]["status"], "already_enriched");
    assert_eq!(report[1]["status"], "conflict");
    assert_eq!(report[1]["name"], "a");
    assert!(report[1].get("field").is_none());
    assert_eq!(report[2]["status"], "created");
    assert_eq!(report[2]["field"]["name"], "b");
}

#[tokio::test]
async fn test_catalog_failure_reported_per_feature() {
    let (app, _) = app_with(
        MemoryFieldStore::new(),
        FixedCatalog { answer: None, fail: true, calls: AtomicUsize::new(0) },
    );

    let body = collection(vec![square("a", 0.0, 0.0)]);
    let (status, report) =
        send(&app, "POST", "/api/v1/geo/satellite-image/report", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report[0]["status"], "lookup_failed");
    assert_eq!(report[0]["reason"], "catalog down");

    let (status, fields) = send(&app, "POST", "/api/v1/geo/satellite-image", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fields, json!([]));
}

#[tokio::test]
async fn test_insert_fields_is_idempotent() {
    let (app, catalog) = app();
    let body = collection(vec![square("plot", 0.0, 0.0)]);

    let (status, first) = send(&app, "POST", "/api/v1/geo/fields", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.as_array().unwrap().len(), 1);
    assert_eq!(first[0]["image_url"], Value::Null);
    assert_eq!(first[0]["image_date"], Value::Null);

    let (_, second) = send(&app, "POST", "/api/v1/geo/fields", Some(body)).await;
    assert_eq!(second, json!([]));
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unnamed_feature_is_unknown() {
    let (app, _) = app();
    let body = collection(vec![polygon(None, json!([[0, 0], [1, 0], [1, 1], [0, 0]]))]);

    let (_, fields) = send(&app, "POST", "/api/v1/geo/fields", Some(body)).await;
    assert_eq!(fields[0]["name"], "Unknown");
    assert_eq!(fields[0]["geom"], "POLYGON ((0 0, 1 0, 1 1, 0 0))");
}

#[tokio::test]
async fn test_fields_intersect() {
    let (app, _) = app();
    let body = collection(vec![square("left", 0.0, 0.0), square("far", 20.0, 20.0)]);
    send(&app, "POST", "/api/v1/geo/fields", Some(body)).await;

    let touching = collection(vec![square("query", 1.0, 0.0)]);
    let (status, hits) = send(&app, "POST", "/api/v1/geo/fields-intersect", Some(touching)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "left");

    let nowhere = collection(vec![square("query", 50.0, 50.0)]);
    let (_, hits) = send(&app, "POST", "/api/v1/geo/fields-intersect", Some(nowhere)).await;
    assert_eq!(hits, json!([]));
}

#[tokio::test]
async fn test_validation_errors_are_unprocessable() {
    let (app, _) = app();

    let empty_ring = collection(vec![polygon(Some("bad"), json!([]))]);
    let (status, body) = send(&app, "POST", "/api/v1/geo/satellite-image", Some(empty_ring)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid request");

    let point = collection(vec![json!({
        "type": "Feature",
        "properties": {"name": "pin"},
        "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
    })]);
    let (status, _) = send(&app, "POST", "/api/v1/geo/fields", Some(point)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) =
        send(&app, "POST", "/api/v1/geo/fields-intersect", Some(collection(vec![]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, listed) = send(&app, "GET", "/api/v1/geo/fields", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = MemoryFieldStore::new();
    store.drop_schema().await.unwrap();
    let (app, _) = app_with(
        store,
        FixedCatalog { answer: None, fail: false, calls: AtomicUsize::new(0) },
    );

    let (status, body) = send(&app, "GET", "/api/v1/geo/fields", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal error");
}
