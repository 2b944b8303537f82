//! MHRD Core - dashboard data pipeline
//!
//! Turns a flat collection of education initiatives (state × scheme × year)
//! into dashboard payloads: summary cards, per-state groupings, trend series
//! and choropleth points.
//!
//! ## Pipeline
//!
//! - **catalog**: fixed enumerations (years, states, schemes, categories, coordinates)
//! - **generator**: deterministic synthetic dataset seeded per triple
//! - **filter**: optional year/state/scheme/category predicates
//! - **aggregate**: scalar and per-state summaries
//! - **payload**: composition of summaries, trends and map points
//! - **report**: content-addressed report identifiers
//!
//! Everything in this crate is synchronous and free of I/O. Persistence,
//! fallback between stores and HTTP live in `mhrd-daemon`.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod aggregate;
pub mod catalog;
pub mod compare;
pub mod export;
pub mod filter;
pub mod generator;
pub mod payload;
pub mod report;
pub mod search;
pub mod types;

pub use aggregate::{round_to, summarize, summarize_by_state, StateSummary, Summary};
pub use catalog::{slugify, Coordinates};
pub use compare::{compare_filters, CompareMetric, CompareSide, CompareTrends, SeriesValue};
pub use export::{export_csv, legacy_report_csv};
pub use filter::{filter_initiatives, FilterParams, InitiativeFilter};
pub use generator::Dataset;
pub use payload::{
    choropleth, map_points, resolve_trend_year, ChoroplethPoint, DashboardPayload, FilterOptions,
    KpiCards, MapPoint, NormalizedInitiative, ScholarshipSeries, TrendSeries,
};
pub use report::{
    canonical_params, derive_report_id, report_files, unknown_report_files, Report, ReportFile,
    ReportStatus,
};
pub use search::{search, SearchHit};
pub use types::{EnrollmentPoint, Initiative, ScholarshipPoint, SchemeRef};
