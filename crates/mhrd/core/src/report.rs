//! Report records and content-addressed report identifiers.
//!
//! A report id is a pure function of its parameters: the parameter document
//! is canonicalized (object keys sorted recursively, compact separators),
//! hashed with SHA-256 and folded into a seven digit suffix. Identical
//! parameters therefore map to the same id in every process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const REPORT_ID_PREFIX: &str = "rpt_";
const REPORT_ID_MODULUS: u64 = 10_000_000;

/// Lifecycle of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Queued,
    Running,
    Ready,
    Failed,
    Unknown,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Queued => "queued",
            ReportStatus::Running => "running",
            ReportStatus::Ready => "ready",
            ReportStatus::Failed => "failed",
            ReportStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = std::convert::Infallible;

    /// Unrecognized values read as `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "queued" => ReportStatus::Queued,
            "running" => ReportStatus::Running,
            "ready" => ReportStatus::Ready,
            "failed" => ReportStatus::Failed,
            _ => ReportStatus::Unknown,
        })
    }
}

/// A persisted report record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: String,
    pub status: ReportStatus,
    pub params: Value,
    pub created_at: DateTime<Utc>,
}

/// A downloadable rendering of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    pub format: String,
    pub url: String,
}

impl ReportFile {
    fn new(format: &str, url: String) -> Self {
        Self {
            format: format.to_string(),
            url,
        }
    }
}

fn csv_file(report_id: &str) -> ReportFile {
    ReportFile::new("csv", format!("/api/v1/exports/data.csv?report={report_id}"))
}

/// PDF and CSV locators. Returned whether or not the report exists.
pub fn report_files(report_id: &str) -> Vec<ReportFile> {
    vec![
        ReportFile::new("pdf", format!("/reports/{report_id}?download=pdf")),
        csv_file(report_id),
    ]
}

/// Locators offered on the detail page of a report that is not on record.
pub fn unknown_report_files(report_id: &str) -> Vec<ReportFile> {
    vec![csv_file(report_id)]
}

/// Compact JSON with object keys sorted at every depth.
pub fn canonical_params(params: &Value) -> String {
    let mut out = String::new();
    write_canonical(params, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// `rpt_` followed by seven digits derived from the canonical parameters.
pub fn derive_report_id(params: &Value) -> String {
    let digest = Sha256::digest(canonical_params(params).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let suffix = u64::from_be_bytes(prefix) % REPORT_ID_MODULUS;
    format!("{REPORT_ID_PREFIX}{suffix:07}")
}
