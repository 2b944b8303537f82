//! Catalog metadata handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use mhrd_core::catalog::{sorted, CATEGORIES, SCHEMES, YEARS};
use mhrd_core::SchemeRef;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub states: Vec<String>,
    pub schemes: Vec<SchemeRef>,
    pub categories: Vec<String>,
    pub years: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct SchemesResponse {
    pub schemes: Vec<SchemeRef>,
}

fn scheme_refs() -> Vec<SchemeRef> {
    sorted(&SCHEMES)
        .iter()
        .map(|name| SchemeRef::from_name(name))
        .collect()
}

/// Option lists for the dashboard filters
pub async fn meta(State(state): State<AppState>) -> Json<MetaResponse> {
    Json(MetaResponse {
        states: state.dataset.state_names(),
        schemes: scheme_refs(),
        categories: sorted(&CATEGORIES),
        years: YEARS.to_vec(),
    })
}

pub async fn list_schemes() -> Json<SchemesResponse> {
    Json(SchemesResponse {
        schemes: scheme_refs(),
    })
}
