//! Deterministic synthetic dataset.
//!
//! Every (state, scheme, year) triple gets its own PRNG seeded from a
//! SHA-256 digest of `"{state}::{scheme}::{year}"`, so regenerating the
//! dataset always yields identical records and changing one triple never
//! shifts the values of another. The two auxiliary series are closed-form.

use crate::aggregate::round_to;
use crate::catalog::{
    scheme_category_hint, BASE_YEAR, CATEGORIES, MONTHS, SCHEMES, SCHOLARSHIP_CATEGORY,
    SCHOLARSHIP_STATE_WEIGHTS, STATES, STATUSES, STATUS_WEIGHTS, YEARS,
};
use crate::types::{EnrollmentPoint, Initiative, ScholarshipPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Values derived for a single triple, before identity fields are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticValues {
    pub category: String,
    pub status: String,
    pub progress: f64,
    pub schools_impacted: i64,
    pub students_impacted: i64,
    pub scholarships_awarded: i64,
    pub budget_utilized: f64,
}

/// 48-bit seed: the first 12 hex digits of the triple's SHA-256.
pub fn seed_for(state: &str, scheme: &str, year: i32) -> u64 {
    let digest = Sha256::digest(format!("{state}::{scheme}::{year}").as_bytes());
    digest[..6]
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

/// Linear growth relative to [`BASE_YEAR`].
pub fn year_factor(year: i32) -> f64 {
    1.0 + 0.05 * f64::from(year - BASE_YEAR)
}

fn weighted_status(rng: &mut StdRng) -> &'static str {
    let total: u32 = STATUS_WEIGHTS.iter().sum();
    let mut ticket = rng.gen_range(0..total);
    for (status, weight) in STATUSES.into_iter().zip(STATUS_WEIGHTS) {
        if ticket < weight {
            return status;
        }
        ticket -= weight;
    }
    STATUSES[STATUSES.len() - 1]
}

/// Derive the metrics for one triple. The draw order is fixed.
pub fn synthetic_values(state: &str, scheme: &str, year: i32) -> SyntheticValues {
    let mut rng = StdRng::seed_from_u64(seed_for(state, scheme, year));

    // drawn unconditionally so hinted and unhinted schemes consume the same stream
    let fallback_category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
    let category = scheme_category_hint(scheme).unwrap_or(fallback_category);

    let base_students: i64 = rng.gen_range(8_000..=60_000);
    let base_schools: i64 = rng.gen_range(80..=1_200);
    let progress = round_to(rng.gen_range(0.35..=0.98), 2);
    let status = weighted_status(&mut rng);
    let scholarships: i64 = if category == SCHOLARSHIP_CATEGORY {
        rng.gen_range(200..=4_000)
    } else {
        rng.gen_range(0..=1_200)
    };
    let budget = round_to(rng.gen_range(3.0..=20.0), 1);

    let factor = year_factor(year);
    SyntheticValues {
        category: category.to_string(),
        status: status.to_string(),
        progress,
        schools_impacted: (base_schools as f64 * factor) as i64,
        students_impacted: (base_students as f64 * factor) as i64,
        scholarships_awarded: (scholarships as f64 * factor) as i64,
        budget_utilized: round_to(budget * factor, 1),
    }
}

/// Full cross product, ids assigned in year → state → scheme order.
pub fn generate_initiatives() -> Vec<Initiative> {
    let mut initiatives = Vec::with_capacity(YEARS.len() * STATES.len() * SCHEMES.len());
    let mut next_id = 1;

    for year in YEARS {
        for state in STATES {
            for scheme in SCHEMES {
                let values = synthetic_values(state, scheme, year);
                initiatives.push(Initiative {
                    id: next_id,
                    name: format!("{scheme} - {state}"),
                    state: state.to_string(),
                    scheme: scheme.to_string(),
                    category: values.category,
                    year,
                    status: values.status,
                    progress: values.progress,
                    schools_impacted: values.schools_impacted,
                    students_impacted: values.students_impacted,
                    scholarships_awarded: values.scholarships_awarded,
                    budget_utilized: values.budget_utilized,
                });
                next_id += 1;
            }
        }
    }

    initiatives
}

pub fn enrollment_series() -> Vec<EnrollmentPoint> {
    let mut points = Vec::with_capacity(YEARS.len() * MONTHS.len());
    for year in YEARS {
        let growth = 1.0 + 0.03 * f64::from(year - BASE_YEAR);
        for (offset, month) in MONTHS.into_iter().enumerate() {
            let index = offset as f64 + 1.0;
            let base_primary = 4100.0 + index * 120.0;
            let base_secondary = 2300.0 + index * 95.0;
            points.push(EnrollmentPoint {
                year,
                month,
                primary: (base_primary * growth) as i64,
                secondary: (base_secondary * growth * 0.83) as i64,
            });
        }
    }
    points
}

pub fn scholarship_series() -> Vec<ScholarshipPoint> {
    let mut points = Vec::with_capacity(YEARS.len() * SCHOLARSHIP_STATE_WEIGHTS.len());
    for year in YEARS {
        let trend = 0.9 + 0.06 * f64::from(year - BASE_YEAR);
        for (state, weight) in SCHOLARSHIP_STATE_WEIGHTS {
            points.push(ScholarshipPoint {
                year,
                state,
                beneficiaries: (850.0 * weight * trend) as i64,
            });
        }
    }
    points
}

/// The immutable in-memory dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    initiatives: Vec<Initiative>,
    enrollment: Vec<EnrollmentPoint>,
    scholarships: Vec<ScholarshipPoint>,
}

static GLOBAL: OnceLock<Dataset> = OnceLock::new();

impl Dataset {
    pub fn generate() -> Self {
        let dataset = Self {
            initiatives: generate_initiatives(),
            enrollment: enrollment_series(),
            scholarships: scholarship_series(),
        };
        tracing::debug!(
            initiatives = dataset.initiatives.len(),
            enrollment_points = dataset.enrollment.len(),
            scholarship_points = dataset.scholarships.len(),
            "Generated synthetic dataset"
        );
        dataset
    }

    /// Process-wide dataset, built on first access.
    pub fn global() -> &'static Dataset {
        GLOBAL.get_or_init(Dataset::generate)
    }

    pub fn initiatives(&self) -> &[Initiative] {
        &self.initiatives
    }

    pub fn enrollment(&self) -> &[EnrollmentPoint] {
        &self.enrollment
    }

    pub fn scholarships(&self) -> &[ScholarshipPoint] {
        &self.scholarships
    }

    /// Distinct state names present in the initiatives, sorted.
    pub fn state_names(&self) -> Vec<String> {
        self.initiatives
            .iter()
            .map(|i| i.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn initiatives_for_scheme(&self, scheme: &str) -> impl Iterator<Item = &Initiative> + '_ {
        let scheme = scheme.to_string();
        self.initiatives.iter().filter(move |i| i.scheme == scheme)
    }
}
