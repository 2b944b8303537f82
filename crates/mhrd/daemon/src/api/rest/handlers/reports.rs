//! Report registry handlers

use crate::api::rest::state::AppState;
use crate::registry::{ReportDescriptor, ReportTicket};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

/// Register a report for the posted parameters.
///
/// The body is read raw: an empty or malformed body is treated as `{}`
/// rather than rejected.
pub async fn create_report(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ReportTicket>) {
    let params = serde_json::from_slice::<Value>(&body).unwrap_or_else(|e| {
        if !body.is_empty() {
            tracing::debug!(error = %e, "Unparseable report parameters, using {{}}");
        }
        Value::Object(Map::new())
    });

    let ticket = state.registry.create(params).await;
    (StatusCode::ACCEPTED, Json(ticket))
}

/// Status and download locators for a report
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ReportDescriptor> {
    Json(state.registry.describe(&id).await)
}

#[cfg(test)]
mod tests {
    use crate::api::rest::test_support::{get_json, post_raw, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_create_returns_accepted_ticket() {
        let (status, body) = post_raw(test_app(), "/api/v1/reports", r#"{"state":"Kerala"}"#).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "ready");
        assert!(body["reportId"].as_str().unwrap().starts_with("rpt_"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_accepted_as_empty() {
        let app = test_app();
        let (status, garbage) = post_raw(app.clone(), "/api/v1/reports", "{not json").await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (_, empty) = post_raw(app, "/api/v1/reports", "{}").await;
        assert_eq!(garbage["reportId"], empty["reportId"]);
    }

    #[tokio::test]
    async fn test_created_report_is_described() {
        let app = test_app();
        let (_, ticket) = post_raw(app.clone(), "/api/v1/reports", r#"{"year":2024}"#).await;
        let id = ticket["reportId"].as_str().unwrap();

        let (status, body) = get_json(app, &format!("/api/v1/reports/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reportId"], id);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["files"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_report_reads_unknown() {
        let (status, body) = get_json(test_app(), "/api/v1/reports/rpt_0000000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unknown");
        assert_eq!(body["files"][0]["format"], "pdf");
    }
}
