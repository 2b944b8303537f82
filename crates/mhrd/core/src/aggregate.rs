//! Scalar and per-state reductions over a filtered initiative collection.

use crate::types::Initiative;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Round to `places` decimal places, halves away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Zero-guarded mean of a progress sum.
fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        round_to(sum / count as f64, 2)
    }
}

/// Dashboard summary cards for a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub schools: i64,
    pub students: i64,
    pub scholarships: i64,
    pub avg_progress_ratio: f64,
    pub avg_progress_pct: f64,
    pub initiatives: usize,
}

/// Metrics for a single state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    pub schools: i64,
    pub students: i64,
    pub scholarships: i64,
    pub progress_sum: f64,
    pub initiatives: usize,
    pub avg_progress: f64,
}

pub fn summarize(initiatives: &[Initiative]) -> Summary {
    let mut summary = Summary::default();
    let mut progress_sum = 0.0;

    for item in initiatives {
        summary.schools += item.schools_impacted;
        summary.students += item.students_impacted;
        summary.scholarships += item.scholarships_awarded;
        progress_sum += item.progress;
    }

    summary.initiatives = initiatives.len();
    summary.avg_progress_ratio = average(progress_sum, initiatives.len());
    summary.avg_progress_pct = round_to(summary.avg_progress_ratio * 100.0, 2);
    summary
}

/// Group by state name. Keys iterate in name order.
pub fn summarize_by_state(initiatives: &[Initiative]) -> BTreeMap<String, StateSummary> {
    let mut by_state: BTreeMap<String, StateSummary> = BTreeMap::new();

    for item in initiatives {
        let entry = by_state.entry(item.state.clone()).or_default();
        entry.schools += item.schools_impacted;
        entry.students += item.students_impacted;
        entry.scholarships += item.scholarships_awarded;
        entry.progress_sum += item.progress;
        entry.initiatives += 1;
    }

    for entry in by_state.values_mut() {
        entry.avg_progress = average(entry.progress_sum, entry.initiatives);
    }

    by_state
}
