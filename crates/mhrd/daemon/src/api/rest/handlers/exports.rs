//! CSV download handlers

use crate::api::rest::extract::LenientQuery;
use crate::api::rest::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use mhrd_core::{export_csv, legacy_report_csv, FilterParams};

const EXPORT_FILENAME: &str = "mhrd_export.csv";
const LEGACY_FILENAME: &str = "mhrd_dashboard_report.csv";

fn csv_attachment(body: String, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Filtered initiatives as CSV (`/api/v1/exports/data.csv`)
pub async fn export_data_csv(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Response {
    let initiatives = state.initiatives(&params).await;
    tracing::debug!(rows = initiatives.len(), "Exporting CSV");
    csv_attachment(export_csv(&initiatives), EXPORT_FILENAME)
}

/// Legacy download layout with status column (`/reports/download/`)
pub async fn download_report(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Response {
    let initiatives = state.initiatives(&params).await;
    csv_attachment(legacy_report_csv(&initiatives), LEGACY_FILENAME)
}

#[cfg(test)]
mod tests {
    use crate::api::rest::test_support::{get_raw, test_app};
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_export_headers_and_rows() {
        let (status, headers, body) = get_raw(test_app(), "/api/v1/exports/data.csv?state=Goa&year=2024").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
        assert!(headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("mhrd_export.csv"));

        let lines: Vec<&str> = body.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines[0],
            "name,state,scheme,category,year,progress,schools,students,scholarships,budget"
        );
        assert_eq!(lines.len(), 1 + 13);
    }

    #[tokio::test]
    async fn test_legacy_download_layout() {
        let (status, headers, body) = get_raw(test_app(), "/reports/download/?state=Kerala&year=2023").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("mhrd_dashboard_report.csv"));
        assert!(body.starts_with("Initiative,State,Scheme,Category,Year,Status,Progress"));
    }
}
