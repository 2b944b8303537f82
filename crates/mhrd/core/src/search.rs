//! Free-text lookup over initiatives.

use crate::types::Initiative;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub scheme: String,
    pub year: i32,
    pub category: String,
}

impl From<&Initiative> for SearchHit {
    fn from(item: &Initiative) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            state: item.state.clone(),
            scheme: item.scheme.clone(),
            year: item.year,
            category: item.category.clone(),
        }
    }
}

/// Normalized form of a query: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive substring match on name, state or scheme.
/// A blank query matches nothing.
pub fn search(initiatives: &[Initiative], query: &str) -> Vec<SearchHit> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return Vec::new();
    }

    initiatives
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item.state.to_lowercase().contains(&needle)
                || item.scheme.to_lowercase().contains(&needle)
        })
        .map(SearchHit::from)
        .collect()
}
