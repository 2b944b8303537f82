//! Optional predicates over the initiative collection.

use crate::types::Initiative;
use serde::{Deserialize, Serialize};

/// Raw filter values as they arrive on a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl FilterParams {
    /// Empty strings mean "not supplied".
    pub fn normalized(&self) -> Self {
        Self {
            year: non_empty(&self.year),
            state: non_empty(&self.state),
            scheme: non_empty(&self.scheme),
            category: non_empty(&self.category),
        }
    }
}

/// Parsed filter. Absent fields do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeFilter {
    pub year: Option<i32>,
    pub state: Option<String>,
    pub scheme: Option<String>,
    pub category: Option<String>,
}

impl InitiativeFilter {
    /// A year that does not parse as an integer is dropped, not rejected.
    pub fn from_params(params: &FilterParams) -> Self {
        let params = params.normalized();
        Self {
            year: params.year.and_then(|y| y.trim().parse().ok()),
            state: params.state,
            scheme: params.scheme,
            category: params.category,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.year.is_none() && self.state.is_none() && self.scheme.is_none() && self.category.is_none()
    }

    pub fn matches(&self, initiative: &Initiative) -> bool {
        if self.year.is_some_and(|year| initiative.year != year) {
            return false;
        }
        if self.state.as_deref().is_some_and(|s| initiative.state != s) {
            return false;
        }
        if self.scheme.as_deref().is_some_and(|s| initiative.scheme != s) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| initiative.category != c) {
            return false;
        }
        true
    }
}

/// Exact-match filtering, preserving input order.
pub fn filter_initiatives(initiatives: &[Initiative], filter: &InitiativeFilter) -> Vec<Initiative> {
    initiatives
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SCHEMES;
    use crate::generator::Dataset;

    fn params(year: Option<&str>, state: Option<&str>) -> FilterParams {
        FilterParams {
            year: year.map(String::from),
            state: state.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_kerala_2024_has_one_initiative_per_scheme() {
        let filter = InitiativeFilter::from_params(&params(Some("2024"), Some("Kerala")));
        let result = filter_initiatives(Dataset::global().initiatives(), &filter);

        assert_eq!(result.len(), SCHEMES.len());
        assert_eq!(result.len(), 13);
        assert!(result.iter().all(|i| i.year == 2024 && i.state == "Kerala"));
    }

    #[test]
    fn test_non_numeric_year_is_ignored() {
        let filter = InitiativeFilter::from_params(&params(Some("twenty"), Some("Goa")));
        assert_eq!(filter.year, None);

        let result = filter_initiatives(Dataset::global().initiatives(), &filter);
        assert_eq!(result.len(), 3 * 13);
    }

    #[test]
    fn test_empty_strings_do_not_restrict() {
        let filter = InitiativeFilter::from_params(&FilterParams {
            year: Some(String::new()),
            state: Some(String::new()),
            scheme: Some(String::new()),
            category: Some(String::new()),
        });
        assert!(filter.is_unrestricted());
        assert_eq!(
            filter_initiatives(Dataset::global().initiatives(), &filter).len(),
            Dataset::global().initiatives().len()
        );
    }

    #[test]
    fn test_category_and_scheme_match_exactly() {
        let filter = InitiativeFilter::default()
            .with_scheme("SWAYAM")
            .with_year(2023);
        let result = filter_initiatives(Dataset::global().initiatives(), &filter);
        assert_eq!(result.len(), 36);

        let lowercase = InitiativeFilter::default().with_scheme("swayam");
        assert!(filter_initiatives(Dataset::global().initiatives(), &lowercase).is_empty());

        let scholarships = InitiativeFilter {
            category: Some("Scholarships".to_string()),
            ..Default::default()
        };
        let result = filter_initiatives(Dataset::global().initiatives(), &scholarships);
        assert!(!result.is_empty());
        assert!(result
            .iter()
            .all(|i| i.scheme == "National Means-cum-Merit Scholarship"));
    }

    #[test]
    fn test_padded_year_parses() {
        let filter = InitiativeFilter::from_params(&params(Some(" 2025 "), None));
        assert_eq!(filter.year, Some(2025));
    }
}
