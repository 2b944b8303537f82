//! Report registry: idempotent report creation and status lookup

use crate::storage::Storage;
use chrono::{DateTime, Utc};
use mhrd_core::{
    derive_report_id, report_files, unknown_report_files, Report, ReportFile, ReportStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Most reports the listing page shows
pub const RECENT_REPORTS_LIMIT: usize = 200;

/// Response to a creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTicket {
    pub report_id: String,
    pub status: ReportStatus,
}

/// Status and download locators for a report ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDescriptor {
    pub report_id: String,
    pub status: ReportStatus,
    pub files: Vec<ReportFile>,
}

/// Report detail page context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDetail {
    pub report_id: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub files: Vec<ReportFile>,
}

/// Creation is synchronous: a created report is `ready` at once.
#[derive(Clone)]
pub struct ReportRegistry {
    storage: Arc<dyn Storage>,
}

impl ReportRegistry {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Only JSON objects are kept as parameters; anything else becomes `{}`.
    pub fn normalize_params(params: Value) -> Value {
        match params {
            Value::Object(map) => Value::Object(map),
            _ => Value::Object(Map::new()),
        }
    }

    /// Same parameters, same ID. A failed store write is logged and the
    /// ticket is still returned.
    pub async fn create(&self, params: Value) -> ReportTicket {
        let params = Self::normalize_params(params);
        let report_id = derive_report_id(&params);
        let status = ReportStatus::Ready;

        match self.storage.upsert_report(&report_id, status, params).await {
            Ok(_) => tracing::info!(report_id = %report_id, "Report created"),
            Err(e) => tracing::warn!(report_id = %report_id, error = %e, "Failed to persist report"),
        }

        ReportTicket { report_id, status }
    }

    async fn lookup(&self, report_id: &str) -> Option<Report> {
        match self.storage.get_report(report_id).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(report_id = %report_id, error = %e, "Report lookup failed");
                None
            }
        }
    }

    /// Unknown IDs and lookup failures read as `unknown`; files are always listed.
    pub async fn describe(&self, report_id: &str) -> ReportDescriptor {
        let status = self
            .lookup(report_id)
            .await
            .map_or(ReportStatus::Unknown, |r| r.status);

        ReportDescriptor {
            report_id: report_id.to_string(),
            status,
            files: report_files(report_id),
        }
    }

    pub async fn detail(&self, report_id: &str) -> ReportDetail {
        match self.lookup(report_id).await {
            Some(report) => ReportDetail {
                files: report_files(&report.report_id),
                report_id: report.report_id,
                status: report.status,
                created_at: Some(report.created_at),
                params: Some(report.params),
            },
            None => ReportDetail {
                report_id: report_id.to_string(),
                status: ReportStatus::Unknown,
                created_at: None,
                params: None,
                files: unknown_report_files(report_id),
            },
        }
    }

    /// Newest first, at most [`RECENT_REPORTS_LIMIT`]
    pub async fn recent(&self, limit: usize) -> Vec<Report> {
        match self.storage.list_reports(limit.min(RECENT_REPORTS_LIMIT)).await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list reports");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use serde_json::json;

    fn registry() -> ReportRegistry {
        ReportRegistry::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let registry = registry();
        let a = registry.create(json!({"state": "Kerala", "year": 2024})).await;
        let b = registry.create(json!({"year": 2024, "state": "Kerala"})).await;
        assert_eq!(a, b);
        assert_eq!(a.status, ReportStatus::Ready);
        assert_eq!(registry.recent(10).await.len(), 1);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let registry = registry();
        let ticket = registry.create(json!({"scheme": "GIAN"})).await;
        let described = registry.describe(&ticket.report_id).await;
        assert_eq!(described.status, ReportStatus::Ready);
        assert!(described
            .files
            .iter()
            .all(|f| f.url.contains(&ticket.report_id)));

        let detail = registry.detail(&ticket.report_id).await;
        assert_eq!(detail.params, Some(json!({"scheme": "GIAN"})));
        assert!(detail.created_at.is_some());
        assert_eq!(detail.files.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_report() {
        let registry = registry();
        let described = registry.describe("rpt_9999999").await;
        assert_eq!(described.status, ReportStatus::Unknown);
        assert_eq!(described.files.len(), 2);

        let detail = registry.detail("rpt_9999999").await;
        assert_eq!(detail.status, ReportStatus::Unknown);
        assert_eq!(detail.files.len(), 1);
        assert_eq!(detail.files[0].format, "csv");
    }

    #[tokio::test]
    async fn test_non_object_params_become_empty() {
        let registry = registry();
        let list = registry.create(json!([1, 2, 3])).await;
        let empty = registry.create(json!({})).await;
        assert_eq!(list.report_id, empty.report_id);

        let detail = registry.detail(&list.report_id).await;
        assert_eq!(detail.params, Some(json!({})));
    }

    #[test]
    fn test_ticket_wire_shape() {
        let ticket = ReportTicket {
            report_id: "rpt_0000001".to_string(),
            status: ReportStatus::Ready,
        };
        assert_eq!(
            serde_json::to_value(&ticket).unwrap(),
            json!({"reportId": "rpt_0000001", "status": "ready"})
        );
    }
}
