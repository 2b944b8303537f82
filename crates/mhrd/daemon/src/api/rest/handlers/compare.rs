//! Year-over-year comparison handler

use crate::api::rest::extract::LenientQuery;
use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use mhrd_core::catalog::YEARS;
use mhrd_core::{compare_filters, summarize, CompareMetric, CompareSide, CompareTrends};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

async fn side(state: &AppState, label: String, query: &CompareQuery, metric: CompareMetric) -> CompareSide {
    let base = compare_filters(&label, query.scheme.as_deref(), query.category.as_deref());

    let mut values = Vec::with_capacity(YEARS.len());
    for year in YEARS {
        let initiatives = state.resolver.resolve(&base.clone().with_year(year)).await;
        values.push(metric.value(&summarize(&initiatives)));
    }

    CompareSide { label, values }
}

/// Per-year metric for two states through the dashboard pipeline
pub async fn compare_trends(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<CompareQuery>,
) -> Json<CompareTrends> {
    let metric = CompareMetric::parse(query.metric.as_deref());
    let left = side(&state, query.left.clone().unwrap_or_default(), &query, metric).await;
    let right = side(&state, query.right.clone().unwrap_or_default(), &query, metric).await;

    Json(CompareTrends {
        years: YEARS.to_vec(),
        metric: CompareMetric::label(query.metric.as_deref()),
        left,
        right,
    })
}
