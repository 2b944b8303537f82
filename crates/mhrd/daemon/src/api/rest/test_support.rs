//! Router helpers shared by handler tests

use super::router::create_router;
use super::state::AppState;
use crate::config::ServerConfig;
use crate::import::import_demo_data;
use crate::storage::InMemoryStorage;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use mhrd_core::Dataset;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router over an empty in-memory store
pub(crate) fn test_app() -> Router {
    let state = AppState::new(Arc::new(InMemoryStorage::new()), Dataset::global());
    create_router(state, &ServerConfig::default())
}

/// Router over an in-memory store holding the imported demo data
pub(crate) async fn imported_app() -> Router {
    let storage = Arc::new(InMemoryStorage::new());
    import_demo_data(storage.as_ref(), Dataset::global())
        .await
        .unwrap();
    create_router(AppState::new(storage, Dataset::global()), &ServerConfig::default())
}

pub(crate) async fn get_raw(app: Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

pub(crate) async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get_raw(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

pub(crate) async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
