//! Record types shared by every stage of the pipeline.

use crate::catalog::slugify;
use serde::{Deserialize, Serialize};

/// One state × scheme × year programme record.
///
/// This is the flat shape both the synthetic dataset and the persisted
/// store produce; nested state/scheme rows are resolved to display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub scheme: String,
    pub category: String,
    pub year: i32,
    pub status: String,
    /// Completion ratio in `[0.0, 1.0]`.
    pub progress: f64,
    pub schools_impacted: i64,
    pub students_impacted: i64,
    pub scholarships_awarded: i64,
    /// Crores.
    pub budget_utilized: f64,
}

/// Public reference to a scheme as exposed by the meta endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl SchemeRef {
    pub fn from_name(name: &str) -> Self {
        let slug = slugify(name);
        Self {
            id: slug.clone(),
            name: name.to_string(),
            slug,
        }
    }
}

/// Monthly enrollment figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentPoint {
    pub year: i32,
    pub month: &'static str,
    pub primary: i64,
    pub secondary: i64,
}

/// Scholarship beneficiaries for one state and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScholarshipPoint {
    pub year: i32,
    pub state: &'static str,
    pub beneficiaries: i64,
}
