//! Page contexts
//!
//! Each server-rendered page of the dashboard is exposed as the JSON
//! context a template would receive. Templates themselves are not served.

use crate::api::rest::extract::LenientQuery;
use crate::api::rest::state::AppState;
use crate::registry::{ReportDetail, RECENT_REPORTS_LIMIT};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mhrd_core::catalog::{sorted, SCHEMES, STATES, YEARS};
use mhrd_core::{slugify, DashboardPayload, FilterOptions, FilterParams, Report};
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Serialize)]
pub struct OverviewContext {
    pub payload: DashboardPayload,
    pub filters: FilterOptions,
}

#[derive(Debug, Serialize)]
pub struct StatesContext {
    pub states: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StateDetailContext {
    pub state: String,
    pub payload: DashboardPayload,
    pub filters: FilterOptions,
}

#[derive(Debug, Serialize)]
pub struct SchemeListing {
    pub name: String,
    pub slug: String,
    pub initiatives_count: usize,
    pub states_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SchemesContext {
    pub schemes: Vec<SchemeListing>,
}

#[derive(Debug, Serialize)]
pub struct SchemeDetailContext {
    pub scheme: String,
    pub payload: DashboardPayload,
    pub filters: FilterOptions,
}

#[derive(Debug, Serialize)]
pub struct CompareOptions {
    pub years: Vec<i32>,
    pub states: Vec<String>,
    pub schemes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompareContext {
    pub filters: CompareOptions,
}

#[derive(Debug, Serialize)]
pub struct ReportsContext {
    pub reports: Vec<Report>,
}

/// Slug to display name: catalog entries first, persisted rows on top.
async fn state_slugs(state: &AppState) -> BTreeMap<String, String> {
    let mut slugs: BTreeMap<String, String> = STATES
        .iter()
        .map(|name| (slugify(name), name.to_string()))
        .collect();

    match state.storage.list_states().await {
        Ok(records) => slugs.extend(records.into_iter().map(|r| (r.slug, r.name))),
        Err(e) => tracing::debug!(error = %e, "Persisted states unavailable for slug lookup"),
    }
    slugs
}

async fn scheme_slugs(state: &AppState) -> BTreeMap<String, String> {
    let mut slugs: BTreeMap<String, String> = SCHEMES
        .iter()
        .map(|name| (slugify(name), name.to_string()))
        .collect();

    match state.storage.list_schemes().await {
        Ok(records) => slugs.extend(records.into_iter().map(|r| (r.slug, r.name))),
        Err(e) => tracing::debug!(error = %e, "Persisted schemes unavailable for slug lookup"),
    }
    slugs
}

/// `/` and `/dashboard`
pub async fn overview(
    State(state): State<AppState>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Json<OverviewContext> {
    Json(OverviewContext {
        payload: state.dashboard(&params).await,
        filters: FilterOptions::from_dataset(state.dataset),
    })
}

pub async fn states_page(State(state): State<AppState>) -> Json<StatesContext> {
    Json(StatesContext {
        states: state.dataset.state_names(),
    })
}

pub async fn state_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Response {
    let slugs = state_slugs(&state).await;
    let Some(name) = slugs.get(&slug).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"state": null, "initiatives": []})),
        )
            .into_response();
    };

    let params = FilterParams {
        state: Some(name.clone()),
        ..params
    };
    let mut filters = FilterOptions::from_dataset(state.dataset);
    let names: BTreeSet<String> = filters.states.drain(..).chain(slugs.into_values()).collect();
    filters.states = names.into_iter().collect();

    Json(StateDetailContext {
        payload: state.dashboard(&params).await,
        state: name,
        filters,
    })
    .into_response()
}

pub async fn schemes_page(State(state): State<AppState>) -> Json<SchemesContext> {
    let schemes = sorted(&SCHEMES)
        .into_iter()
        .map(|name| {
            let states: BTreeSet<&str> = state
                .dataset
                .initiatives_for_scheme(&name)
                .map(|i| i.state.as_str())
                .collect();
            SchemeListing {
                slug: slugify(&name),
                initiatives_count: state.dataset.initiatives_for_scheme(&name).count(),
                states_count: states.len(),
                name,
            }
        })
        .collect();

    Json(SchemesContext { schemes })
}

pub async fn scheme_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    LenientQuery(params): LenientQuery<FilterParams>,
) -> Response {
    let slugs = scheme_slugs(&state).await;
    let Some(name) = slugs.get(&slug).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"scheme": null, "payload": {}})),
        )
            .into_response();
    };

    let params = FilterParams {
        scheme: Some(name.clone()),
        ..params
    };
    let mut filters = FilterOptions::from_dataset(state.dataset);
    let names: BTreeSet<String> = slugs.into_values().collect();
    filters.schemes = names.into_iter().collect();

    Json(SchemeDetailContext {
        payload: state.dashboard(&params).await,
        scheme: name,
        filters,
    })
    .into_response()
}

pub async fn compare_page(State(state): State<AppState>) -> Json<CompareContext> {
    Json(CompareContext {
        filters: CompareOptions {
            years: YEARS.to_vec(),
            states: state.dataset.state_names(),
            schemes: sorted(&SCHEMES),
        },
    })
}

pub async fn reports_page(State(state): State<AppState>) -> Json<ReportsContext> {
    Json(ReportsContext {
        reports: state.registry.recent(RECENT_REPORTS_LIMIT).await,
    })
}

pub async fn report_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ReportDetail> {
    Json(state.registry.detail(&id).await)
}
