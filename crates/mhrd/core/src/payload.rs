//! Dashboard response assembly.

use crate::aggregate::{round_to, summarize, summarize_by_state, StateSummary, Summary};
use crate::catalog::{coordinates_for, sorted, CATEGORIES, LATEST_YEAR, MONTHS, SCHEMES, YEARS};
use crate::filter::{FilterParams, InitiativeFilter};
use crate::generator::Dataset;
use crate::types::Initiative;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Year the trend series are drawn for.
pub fn resolve_trend_year(filter: &InitiativeFilter) -> i32 {
    filter.year.unwrap_or(LATEST_YEAR)
}

/// Monthly enrollment for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub primary: Vec<i64>,
    pub secondary: Vec<i64>,
    pub year: i32,
}

impl TrendSeries {
    /// Points come out in calendar order; an unknown year yields empty series.
    pub fn for_year(dataset: &Dataset, year: i32) -> Self {
        let (primary, secondary) = dataset
            .enrollment()
            .iter()
            .filter(|p| p.year == year)
            .map(|p| (p.primary, p.secondary))
            .unzip();
        Self {
            labels: MONTHS.iter().map(|m| m.to_string()).collect(),
            primary,
            secondary,
            year,
        }
    }
}

/// Scholarship beneficiaries for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipSeries {
    pub states: Vec<String>,
    pub values: Vec<i64>,
    pub year: i32,
}

impl ScholarshipSeries {
    pub fn for_year(dataset: &Dataset, year: i32) -> Self {
        let (states, values) = dataset
            .scholarships()
            .iter()
            .filter(|p| p.year == year)
            .map(|p| (p.state.to_string(), p.beneficiaries))
            .unzip();
        Self {
            states,
            values,
            year,
        }
    }
}

/// Map marker with coordinates. `avg_progress` is a ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub state: String,
    pub lat: f64,
    pub lng: f64,
    pub schools: i64,
    pub students: i64,
    pub scholarships: i64,
    pub avg_progress: f64,
}

/// Choropleth cell. `avg_progress` is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethPoint {
    pub state: String,
    pub schools: i64,
    pub students: i64,
    pub scholarships: i64,
    pub avg_progress: f64,
}

/// States without known coordinates are dropped. Output is sorted by state.
pub fn map_points(by_state: &BTreeMap<String, StateSummary>) -> Vec<MapPoint> {
    by_state
        .iter()
        .filter_map(|(state, data)| {
            let coords = coordinates_for(state)?;
            Some(MapPoint {
                state: state.clone(),
                lat: coords.lat,
                lng: coords.lng,
                schools: data.schools,
                students: data.students,
                scholarships: data.scholarships,
                avg_progress: data.avg_progress,
            })
        })
        .collect()
}

pub fn choropleth(by_state: &BTreeMap<String, StateSummary>) -> Vec<ChoroplethPoint> {
    by_state
        .iter()
        .filter(|(state, _)| coordinates_for(state).is_some())
        .map(|(state, data)| ChoroplethPoint {
            state: state.clone(),
            schools: data.schools,
            students: data.students,
            scholarships: data.scholarships,
            avg_progress: round_to(data.avg_progress * 100.0, 2),
        })
        .collect()
}

/// An initiative decorated with its progress percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInitiative {
    #[serde(flatten)]
    pub initiative: Initiative,
    pub progress_pct: f64,
}

impl From<Initiative> for NormalizedInitiative {
    fn from(initiative: Initiative) -> Self {
        let progress_pct = round_to(initiative.progress * 100.0, 2);
        Self {
            initiative,
            progress_pct,
        }
    }
}

/// Headline cards for the KPI endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCards {
    pub schools: i64,
    pub students: i64,
    pub scholarships: i64,
    pub avg_progress_pct: f64,
    pub initiatives: usize,
}

impl From<&Summary> for KpiCards {
    fn from(summary: &Summary) -> Self {
        Self {
            schools: summary.schools,
            students: summary.students,
            scholarships: summary.scholarships,
            avg_progress_pct: summary.avg_progress_pct,
            initiatives: summary.initiatives,
        }
    }
}

/// Option lists for the filter controls of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub states: Vec<String>,
    pub schemes: Vec<String>,
    pub categories: Vec<String>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            years: YEARS.to_vec(),
            states: dataset.state_names(),
            schemes: sorted(&SCHEMES),
            categories: sorted(&CATEGORIES),
        }
    }
}

/// The full dashboard response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub summary: Summary,
    pub trends: TrendSeries,
    pub scholarships: ScholarshipSeries,
    pub initiatives: Vec<NormalizedInitiative>,
    pub map: Vec<MapPoint>,
    pub filters: FilterParams,
}

impl DashboardPayload {
    /// Compose a payload from an already-resolved initiative collection.
    pub fn assemble(initiatives: Vec<Initiative>, params: &FilterParams, dataset: &Dataset) -> Self {
        let filter = InitiativeFilter::from_params(params);
        let summary = summarize(&initiatives);
        let by_state = summarize_by_state(&initiatives);
        let year = resolve_trend_year(&filter);

        Self {
            summary,
            trends: TrendSeries::for_year(dataset, year),
            scholarships: ScholarshipSeries::for_year(dataset, year),
            map: map_points(&by_state),
            initiatives: initiatives.into_iter().map(NormalizedInitiative::from).collect(),
            filters: params.normalized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_initiatives;

    fn payload_for(params: FilterParams) -> DashboardPayload {
        let dataset = Dataset::global();
        let filter = InitiativeFilter::from_params(&params);
        let initiatives = filter_initiatives(dataset.initiatives(), &filter);
        DashboardPayload::assemble(initiatives, &params, dataset)
    }

    #[test]
    fn test_progress_pct_matches_rounded_ratio() {
        let payload = payload_for(FilterParams::default());
        for item in &payload.initiatives {
            assert_eq!(item.progress_pct, round_to(item.initiative.progress * 100.0, 2));
        }
    }

    #[test]
    fn test_trends_default_to_latest_year() {
        let payload = payload_for(FilterParams::default());
        assert_eq!(payload.trends.year, 2025);
        assert_eq!(payload.scholarships.year, 2025);
        assert_eq!(payload.scholarships.states.len(), 6);
    }

    #[test]
    fn test_trends_follow_filter_year() {
        let series = TrendSeries::for_year(Dataset::global(), 2023);
        assert_eq!(series.labels.len(), 12);
        assert_eq!(series.labels[0], "Jan");
        assert_eq!(series.labels[11], "Dec");
        assert_eq!(series.primary.len(), 12);
        assert_eq!(series.secondary.len(), 12);
        assert!(series.primary.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unknown_trend_year_is_empty() {
        let series = TrendSeries::for_year(Dataset::global(), 1999);
        assert!(series.primary.is_empty());
        assert_eq!(series.labels.len(), 12);
    }

    #[test]
    fn test_map_points_sorted_and_cover_all_states() {
        let payload = payload_for(FilterParams {
            year: Some("2024".to_string()),
            ..Default::default()
        });
        assert_eq!(payload.map.len(), 36);
        assert!(payload.map.windows(2).all(|w| w[0].state < w[1].state));
    }

    #[test]
    fn test_states_without_coordinates_are_dropped() {
        let mut initiatives = filter_initiatives(
            Dataset::global().initiatives(),
            &InitiativeFilter::default().with_state("Kerala").with_year(2024),
        );
        let mut ghost = initiatives[0].clone();
        ghost.state = "Atlantis".to_string();
        initiatives.push(ghost);

        let by_state = summarize_by_state(&initiatives);
        assert_eq!(by_state.len(), 2);

        let points = map_points(&by_state);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].state, "Kerala");
        assert_eq!(choropleth(&by_state).len(), 1);
    }

    #[test]
    fn test_choropleth_uses_percentages() {
        let by_state = summarize_by_state(Dataset::global().initiatives());
        let cells = choropleth(&by_state);
        let points = map_points(&by_state);
        for (cell, point) in cells.iter().zip(points.iter()) {
            assert_eq!(cell.state, point.state);
            assert_eq!(cell.avg_progress, round_to(point.avg_progress * 100.0, 2));
        }
    }

    #[test]
    fn test_payload_echoes_normalized_filters() {
        let payload = payload_for(FilterParams {
            year: Some("abc".to_string()),
            state: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(payload.filters.year.as_deref(), Some("abc"));
        assert_eq!(payload.filters.state, None);
        assert_eq!(payload.summary.initiatives, Dataset::global().initiatives().len());
    }

    #[test]
    fn test_normalized_initiative_serializes_flat() {
        let item = NormalizedInitiative::from(Dataset::global().initiatives()[0].clone());
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("progress_pct").is_some());
        assert!(value.get("schools_impacted").is_some());
        assert!(value.get("initiative").is_none());
    }
}
