//! Persisted record shapes and pagination

use mhrd_core::{slugify, FilterParams, Initiative, InitiativeFilter};
use serde::{Deserialize, Serialize};

/// Default number of records per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Upper bound on a requested page size
pub const MAX_PAGE_SIZE: u32 = 500;

/// A persisted state row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A persisted scheme row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A persisted initiative with its state and scheme nested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativeRecord {
    pub id: i64,
    pub name: String,
    pub state: StateRecord,
    pub scheme: SchemeRecord,
    pub category: String,
    pub year: i32,
    pub status: String,
    pub progress: f64,
    pub schools_impacted: i64,
    pub students_impacted: i64,
    pub scholarships_awarded: i64,
    pub budget_utilized: f64,
}

impl InitiativeRecord {
    /// Flat shape with state and scheme resolved to display names
    pub fn flatten(&self) -> Initiative {
        Initiative {
            id: self.id,
            name: self.name.clone(),
            state: self.state.name.clone(),
            scheme: self.scheme.name.clone(),
            category: self.category.clone(),
            year: self.year,
            status: self.status.clone(),
            progress: self.progress,
            schools_impacted: self.schools_impacted,
            students_impacted: self.students_impacted,
            scholarships_awarded: self.scholarships_awarded,
            budget_utilized: self.budget_utilized,
        }
    }
}

/// Initiative to be inserted. `(name, state_id, scheme_id, year)` is the natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInitiative {
    pub name: String,
    pub state_id: i64,
    pub scheme_id: i64,
    pub category: String,
    pub year: i32,
    pub status: String,
    pub progress: f64,
    pub schools_impacted: i64,
    pub students_impacted: i64,
    pub scholarships_awarded: i64,
    pub budget_utilized: f64,
}

impl NewInitiative {
    pub fn from_initiative(item: &Initiative, state: &StateRecord, scheme: &SchemeRecord) -> Self {
        Self {
            name: item.name.clone(),
            state_id: state.id,
            scheme_id: scheme.id,
            category: item.category.clone(),
            year: item.year,
            status: item.status.clone(),
            progress: item.progress,
            schools_impacted: item.schools_impacted,
            students_impacted: item.students_impacted,
            scholarships_awarded: item.scholarships_awarded,
            budget_utilized: item.budget_utilized,
        }
    }
}

/// Filter for the record listing. State and scheme match by exact name or by slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub year: Option<i32>,
    pub state: Option<String>,
    pub scheme: Option<String>,
    pub category: Option<String>,
}

impl RecordQuery {
    pub fn from_params(params: &FilterParams) -> Self {
        let filter = InitiativeFilter::from_params(params);
        Self {
            year: filter.year,
            state: filter.state,
            scheme: filter.scheme,
            category: filter.category,
        }
    }

    pub fn state_slug(&self) -> Option<String> {
        self.state.as_deref().map(slugify)
    }

    pub fn scheme_slug(&self) -> Option<String> {
        self.scheme.as_deref().map(slugify)
    }

    pub fn matches(&self, record: &InitiativeRecord) -> bool {
        fn name_or_slug(query: Option<&str>, name: &str, slug: &str) -> bool {
            query.map_or(true, |q| name == q || slug == slugify(q))
        }

        self.year.map_or(true, |year| record.year == year)
            && name_or_slug(self.state.as_deref(), &record.state.name, &record.state.slug)
            && name_or_slug(self.scheme.as_deref(), &record.scheme.name, &record.scheme.slug)
            && self
                .category
                .as_deref()
                .map_or(true, |c| record.category == c)
    }
}

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Page numbers below 1 become 1; page sizes are clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Slice an already ordered collection
    pub fn apply<T: Clone>(&self, items: &[T]) -> Page<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let results = items
            .iter()
            .skip(start)
            .take(self.page_size as usize)
            .cloned()
            .collect();
        Page {
            count: items.len() as u64,
            page: self.page,
            page_size: self.page_size,
            results,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}
