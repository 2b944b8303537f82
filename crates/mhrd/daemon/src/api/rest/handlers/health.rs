//! Health and status handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Daemon status response
#[derive(Debug, Serialize)]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub storage_backend: String,
    /// `None` when the store could not be counted
    pub persisted_initiatives: Option<u64>,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> Json<DaemonStatusResponse> {
    let (status, persisted_initiatives) = match state.storage.count_initiatives().await {
        Ok(count) => ("healthy", Some(count)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to count stored initiatives");
            ("degraded", None)
        }
    };

    Json(DaemonStatusResponse {
        status: status.to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        storage_backend: state.storage.backend_name().to_string(),
        persisted_initiatives,
    })
}
