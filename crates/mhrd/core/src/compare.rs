//! Year-over-year comparison of two states.

use crate::aggregate::Summary;
use crate::filter::InitiativeFilter;
use serde::{Deserialize, Serialize};

/// Metric plotted by the comparison view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMetric {
    #[default]
    Students,
    Schools,
    Scholarships,
    AvgProgressPct,
}

impl CompareMetric {
    /// Requested metric name as echoed back: lowercased, `students` when absent.
    pub fn label(raw: Option<&str>) -> String {
        raw.filter(|m| !m.is_empty())
            .unwrap_or("students")
            .to_lowercase()
    }

    /// Case-insensitive; anything unrecognized compares students.
    pub fn parse(raw: Option<&str>) -> Self {
        match Self::label(raw).as_str() {
            "schools" => CompareMetric::Schools,
            "scholarships" => CompareMetric::Scholarships,
            "avg_progress_pct" => CompareMetric::AvgProgressPct,
            _ => CompareMetric::Students,
        }
    }

    pub fn value(&self, summary: &Summary) -> SeriesValue {
        match self {
            CompareMetric::Students => SeriesValue::Count(summary.students),
            CompareMetric::Schools => SeriesValue::Count(summary.schools),
            CompareMetric::Scholarships => SeriesValue::Count(summary.scholarships),
            CompareMetric::AvgProgressPct => SeriesValue::Percent(summary.avg_progress_pct),
        }
    }
}

/// A point in a comparison series: a count, or a percentage for progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValue {
    Count(i64),
    Percent(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSide {
    pub label: String,
    pub values: Vec<SeriesValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareTrends {
    pub years: Vec<i32>,
    /// Requested metric name, which may not be a known metric.
    pub metric: String,
    pub left: CompareSide,
    pub right: CompareSide,
}

/// Filter for one side. An empty label leaves the state unrestricted.
pub fn compare_filters(label: &str, scheme: Option<&str>, category: Option<&str>) -> InitiativeFilter {
    let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(String::from);
    InitiativeFilter {
        year: None,
        state: non_empty(Some(label)),
        scheme: non_empty(scheme),
        category: non_empty(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parsing() {
        assert_eq!(CompareMetric::parse(None), CompareMetric::Students);
        assert_eq!(CompareMetric::parse(Some("SCHOOLS")), CompareMetric::Schools);
        assert_eq!(CompareMetric::parse(Some("avg_progress_pct")), CompareMetric::AvgProgressPct);
        assert_eq!(CompareMetric::parse(Some("budget")), CompareMetric::Students);
        assert_eq!(serde_json::to_value(CompareMetric::AvgProgressPct).unwrap(), "avg_progress_pct");
    }

    #[test]
    fn test_metric_label_echoes_request() {
        assert_eq!(CompareMetric::label(None), "students");
        assert_eq!(CompareMetric::label(Some("")), "students");
        assert_eq!(CompareMetric::label(Some("Budget")), "budget");
        assert_eq!(CompareMetric::label(Some("AVG_PROGRESS_PCT")), "avg_progress_pct");
        assert_eq!(CompareMetric::parse(Some(" schools")), CompareMetric::Students);
    }

    #[test]
    fn test_metric_values() {
        let summary = Summary {
            schools: 1,
            students: 2,
            scholarships: 3,
            avg_progress_ratio: 0.5,
            avg_progress_pct: 50.0,
            initiatives: 4,
        };
        assert_eq!(CompareMetric::Students.value(&summary), SeriesValue::Count(2));
        assert_eq!(CompareMetric::AvgProgressPct.value(&summary), SeriesValue::Percent(50.0));
        assert_eq!(serde_json::to_string(&SeriesValue::Count(2)).unwrap(), "2");
    }

    #[test]
    fn test_empty_label_is_unrestricted() {
        let filter = compare_filters("", None, Some(""));
        assert!(filter.is_unrestricted());

        let filter = compare_filters("Goa", Some("GIAN"), None);
        assert_eq!(filter.state.as_deref(), Some("Goa"));
        assert_eq!(filter.scheme.as_deref(), Some("GIAN"));
    }
}
