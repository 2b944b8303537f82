//! Dashboard handlers: KPI cards, trend series and map data

use crate::api::rest::extract::LenientQuery;
use crate::api::rest::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use mhrd_core::catalog::scheme_by_slug;
use mhrd_core::{
    choropleth, resolve_trend_year, summarize, summarize_by_state, ChoroplethPoint,
    DashboardPayload, FilterParams, InitiativeFilter, KpiCards, MapPoint, Summary, TrendSeries,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct KpisResponse {
    pub cards: KpiCards,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ChoroplethResponse {
    pub choropleth: Vec<ChoroplethPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeKpisResponse {
    pub scheme_id: String,
    pub cards: Summary,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub map: Vec<MapPoint>,
}

/// Summary cards for the filtered collection
pub async fn kpis(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Json<KpisResponse> {
    let initiatives = state.initiatives(&params).await;
    let summary = summarize(&initiatives);
    Json(KpisResponse {
        cards: KpiCards::from(&summary),
        count: initiatives.len(),
    })
}

/// Monthly enrollment for the filter year, or the latest year
pub async fn trends(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Json<TrendSeries> {
    let year = resolve_trend_year(&InitiativeFilter::from_params(&params));
    Json(TrendSeries::for_year(state.dataset, year))
}

/// Per-state choropleth with progress as a percentage
pub async fn map(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Json<ChoroplethResponse> {
    let initiatives = state.initiatives(&params).await;
    Json(ChoroplethResponse {
        choropleth: choropleth(&summarize_by_state(&initiatives)),
    })
}

/// Summary for one scheme; accepts a slug or an exact scheme name
pub async fn scheme_kpis(
    State(state): State<AppState>,
    Path(scheme_id): Path<String>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Json<SchemeKpisResponse> {
    let scheme = scheme_by_slug(&scheme_id).map_or_else(|| scheme_id.clone(), str::to_string);
    let filter = InitiativeFilter::from_params(&params).with_scheme(scheme);
    let initiatives = state.resolver.resolve(&filter).await;

    Json(SchemeKpisResponse {
        scheme_id,
        cards: summarize(&initiatives),
        count: initiatives.len(),
    })
}

/// Full dashboard payload (`/api/data/`)
pub async fn dashboard_data(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Json<DashboardPayload> {
    Json(state.dashboard(&params).await)
}

/// Map markers only (`/api/map/`)
pub async fn map_data(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Json<MapResponse> {
    let payload = state.dashboard(&params).await;
    Json(MapResponse { map: payload.map })
}
