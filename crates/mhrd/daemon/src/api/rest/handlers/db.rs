//! Read-only listing of persisted records (`/api/v1/db`)

use crate::api::rest::extract::LenientQuery;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::{InitiativeRecord, Page, PageRequest, RecordQuery, SchemeRecord, StateRecord};
use axum::{
    extract::{Path, State},
    Json,
};
use mhrd_core::FilterParams;
use serde::{Deserialize, Serialize};

/// Listing query. Numbers arrive as strings so a bad value is ignored
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse().ok());
        PageRequest::new(parse(&self.page), parse(&self.page_size))
    }

    fn record_query(&self) -> RecordQuery {
        RecordQuery::from_params(&FilterParams {
            year: self.year.clone(),
            state: self.state.clone(),
            scheme: self.scheme.clone(),
            category: self.category.clone(),
        })
    }
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid id '{}'", raw)))
}

#[derive(Debug, Serialize)]
pub struct DbIndexResponse {
    pub states: String,
    pub schemes: String,
    pub initiatives: String,
}

pub async fn db_index() -> Json<DbIndexResponse> {
    Json(DbIndexResponse {
        states: "/api/v1/db/states/".to_string(),
        schemes: "/api/v1/db/schemes/".to_string(),
        initiatives: "/api/v1/db/initiatives/".to_string(),
    })
}

pub async fn list_state_records(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<ListQuery>,
) -> ApiResult<Json<Page<StateRecord>>> {
    let states = state.storage.list_states().await?;
    Ok(Json(query.page_request().apply(&states)))
}

pub async fn get_state_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StateRecord>> {
    let id = parse_id(&id)?;
    let record = state
        .storage
        .get_state(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("State {} not found", id)))?;
    Ok(Json(record))
}

pub async fn list_scheme_records(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<ListQuery>,
) -> ApiResult<Json<Page<SchemeRecord>>> {
    let schemes = state.storage.list_schemes().await?;
    Ok(Json(query.page_request().apply(&schemes)))
}

pub async fn get_scheme_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SchemeRecord>> {
    let id = parse_id(&id)?;
    let record = state
        .storage
        .get_scheme(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Scheme {} not found", id)))?;
    Ok(Json(record))
}

/// Year descending, then state name
pub async fn list_initiative_records(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<ListQuery>,
) -> ApiResult<Json<Page<InitiativeRecord>>> {
    let page = state
        .storage
        .list_initiative_records(&query.record_query(), query.page_request())
        .await?;
    Ok(Json(page))
}

pub async fn get_initiative_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InitiativeRecord>> {
    let id = parse_id(&id)?;
    let record = state
        .storage
        .get_initiative_record(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Initiative {} not found", id)))?;
    Ok(Json(record))
}
