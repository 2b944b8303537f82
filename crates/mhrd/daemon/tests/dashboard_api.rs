//! End-to-end scenarios against the full router

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use mhrd_core::Dataset;
use mhrd_daemon::api::create_router;
use mhrd_daemon::api::rest::state::AppState;
use mhrd_daemon::config::ServerConfig;
use mhrd_daemon::{import_demo_data, InMemoryStorage, SqliteStorage, Storage};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router(storage: Arc<dyn Storage>) -> Router {
    create_router(
        AppState::new(storage, Dataset::global()),
        &ServerConfig::default(),
    )
}

fn memory_app() -> Router {
    router(Arc::new(InMemoryStorage::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_and_status() {
    let app = memory_app();

    let (status, body) = get(&app, "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let (_, status_body) = get(&app, "/api/v1/status").await;
    assert_eq!(status_body["status"], "healthy");
    assert_eq!(status_body["storage_backend"], "memory");
    assert_eq!(status_body["persisted_initiatives"], 0);
}

#[tokio::test]
async fn meta_lists_catalog() {
    let (_, body) = get(&memory_app(), "/api/v1/meta").await;
    assert_eq!(body["states"].as_array().unwrap().len(), 36);
    assert_eq!(body["years"], json!([2023, 2024, 2025]));
    assert_eq!(body["categories"].as_array().unwrap().len(), 5);

    let schemes = body["schemes"].as_array().unwrap();
    assert_eq!(schemes.len(), 13);
    assert!(schemes.iter().any(|s| s["slug"] == "samagra-shiksha"));
}

#[tokio::test]
async fn kerala_2024_kpis() {
    let (status, body) = get(&memory_app(), "/api/v1/kpis?year=2024&state=Kerala").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 13);
    assert_eq!(body["cards"]["initiatives"], 13);
}

#[tokio::test]
async fn trends_for_2023() {
    let (_, body) = get(&memory_app(), "/api/v1/trends?year=2023").await;
    assert_eq!(body["year"], 2023);
    assert_eq!(body["labels"].as_array().unwrap().len(), 12);
    assert_eq!(body["primary"].as_array().unwrap().len(), 12);
    assert_eq!(body["secondary"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn search_samagra() {
    let (_, body) = get(&memory_app(), "/api/v1/search?query=samagra").await;
    let results = body["results"].as_array().unwrap();
    assert!(!results.is_empty());
    for hit in results {
        let text = format!("{} {} {}", hit["name"], hit["state"], hit["scheme"]).to_lowercase();
        assert!(text.contains("samagra"));
    }
}

#[tokio::test]
async fn reports_are_idempotent_and_round_trip() {
    let app = memory_app();

    let (status, first) = post(&app, "/api/v1/reports", r#"{"state":"Kerala","year":"2024"}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let (_, second) = post(&app, "/api/v1/reports", r#"{"year":"2024","state":"Kerala"}"#).await;
    assert_eq!(first["reportId"], second["reportId"]);

    let id = first["reportId"].as_str().unwrap();
    let (status, described) = get(&app, &format!("/api/v1/reports/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(described["status"], "ready");
    let formats: Vec<&str> = described["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["format"].as_str().unwrap())
        .collect();
    assert_eq!(formats, vec!["pdf", "csv"]);
}

#[tokio::test]
async fn unknown_report_and_malformed_body() {
    let app = memory_app();

    let (status, body) = get(&app, "/api/v1/reports/rpt_does_not_exist").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unknown");

    let (status, body) = post(&app, "/api/v1/reports", "][").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn csv_export_content_type() {
    let request = Request::builder()
        .uri("/api/v1/exports/data.csv?year=2025")
        .body(Body::empty())
        .unwrap();
    let (status, content_type, body) = send(&memory_app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/csv"));

    let text = String::from_utf8(body).unwrap();
    assert_eq!(text.split("\r\n").filter(|l| !l.is_empty()).count(), 1 + 36 * 13);
}

#[tokio::test]
async fn unknown_state_page_is_not_found() {
    let (status, body) = get(&memory_app(), "/states/narnia").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["state"].is_null());
}

#[tokio::test]
async fn sqlite_store_serves_imported_rows() {
    let storage = Arc::new(SqliteStorage::in_memory().await.unwrap());
    let summary = import_demo_data(storage.as_ref(), Dataset::global())
        .await
        .unwrap();
    assert_eq!(summary.initiatives_created, 1404);

    let app = router(storage);

    let (_, listing) = get(&app, "/api/v1/db/initiatives/?scheme=gian&year=2024").await;
    assert_eq!(listing["count"], 36);
    assert_eq!(listing["results"][0]["scheme"]["name"], "GIAN");

    let (_, status) = get(&app, "/api/v1/status").await;
    assert_eq!(status["storage_backend"], "sqlite");
    assert_eq!(status["persisted_initiatives"], 1404);

    // persisted rows answer the dashboard with the same totals
    let (_, kpis) = get(&app, "/api/v1/kpis?year=2024&state=Kerala").await;
    assert_eq!(kpis["count"], 13);
}
