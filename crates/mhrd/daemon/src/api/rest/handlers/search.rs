//! Free-text search handler

use crate::api::rest::extract::LenientQuery;
use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use mhrd_core::search::normalize_query;
use mhrd_core::SearchHit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Searches the synthetic dataset; the normalized query is echoed back.
pub async fn search_initiatives(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<SearchQuery>,
) -> Json<SearchResponse> {
    let raw = params.query.unwrap_or_default();
    let results = mhrd_core::search(state.dataset.initiatives(), &raw);

    Json(SearchResponse {
        query: normalize_query(&raw),
        results,
    })
}
