//! In-memory storage implementation

use super::records::{
    InitiativeRecord, NewInitiative, Page, PageRequest, RecordQuery, SchemeRecord, StateRecord,
};
use super::traits::*;
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::Utc;
use mhrd_core::{slugify, Coordinates, Initiative, InitiativeFilter, Report, ReportStatus};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use tokio::sync::RwLock;

/// Initiative row as stored: foreign keys instead of nested records
#[derive(Debug, Clone)]
struct StoredInitiative {
    id: i64,
    row: NewInitiative,
}

/// In-memory storage for development and testing
#[derive(Debug)]
pub struct InMemoryStorage {
    states: Arc<RwLock<HashMap<i64, StateRecord>>>,
    schemes: Arc<RwLock<HashMap<i64, SchemeRecord>>>,
    initiatives: Arc<RwLock<HashMap<i64, StoredInitiative>>>,
    reports: Arc<RwLock<HashMap<String, Report>>>,
    sequence: Arc<AtomicI64>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
            schemes: Arc::new(RwLock::new(HashMap::new())),
            initiatives: Arc::new(RwLock::new(HashMap::new())),
            reports: Arc::new(RwLock::new(HashMap::new())),
            sequence: Arc::new(AtomicI64::new(0)),
        }
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Join the stored rows against states and schemes. Rows whose parents
    /// are gone are skipped.
    async fn joined(&self) -> Vec<InitiativeRecord> {
        let states = self.states.read().await;
        let schemes = self.schemes.read().await;
        let initiatives = self.initiatives.read().await;

        let mut records: Vec<InitiativeRecord> = initiatives
            .values()
            .filter_map(|stored| {
                let state = states.get(&stored.row.state_id)?;
                let scheme = schemes.get(&stored.row.scheme_id)?;
                Some(to_record(stored, state, scheme))
            })
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }
}

fn to_record(stored: &StoredInitiative, state: &StateRecord, scheme: &SchemeRecord) -> InitiativeRecord {
    let row = &stored.row;
    InitiativeRecord {
        id: stored.id,
        name: row.name.clone(),
        state: state.clone(),
        scheme: scheme.clone(),
        category: row.category.clone(),
        year: row.year,
        status: row.status.clone(),
        progress: row.progress,
        schools_impacted: row.schools_impacted,
        students_impacted: row.students_impacted,
        scholarships_awarded: row.scholarships_awarded,
        budget_utilized: row.budget_utilized,
    }
}

#[async_trait]
impl CatalogStorage for InMemoryStorage {
    async fn list_states(&self) -> StorageResult<Vec<StateRecord>> {
        let states = self.states.read().await;
        let mut all: Vec<StateRecord> = states.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_state(&self, id: i64) -> StorageResult<Option<StateRecord>> {
        let states = self.states.read().await;
        Ok(states.get(&id).cloned())
    }

    async fn ensure_state(
        &self,
        name: &str,
        coordinates: Option<Coordinates>,
    ) -> StorageResult<StateRecord> {
        let mut states = self.states.write().await;

        if let Some(existing) = states.values_mut().find(|s| s.name == name) {
            if existing.lat.is_none() {
                if let Some(coords) = coordinates {
                    existing.lat = Some(coords.lat);
                    existing.lng = Some(coords.lng);
                }
            }
            return Ok(existing.clone());
        }

        let slug = slugify(name);
        if states.values().any(|s| s.slug == slug) {
            return Err(StorageError::Conflict(format!("state slug '{}' already taken", slug)));
        }

        let record = StateRecord {
            id: self.next_id(),
            name: name.to_string(),
            slug,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
        };
        states.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_schemes(&self) -> StorageResult<Vec<SchemeRecord>> {
        let schemes = self.schemes.read().await;
        let mut all: Vec<SchemeRecord> = schemes.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_scheme(&self, id: i64) -> StorageResult<Option<SchemeRecord>> {
        let schemes = self.schemes.read().await;
        Ok(schemes.get(&id).cloned())
    }

    async fn ensure_scheme(&self, name: &str) -> StorageResult<SchemeRecord> {
        let mut schemes = self.schemes.write().await;

        if let Some(existing) = schemes.values().find(|s| s.name == name) {
            return Ok(existing.clone());
        }

        let slug = slugify(name);
        if schemes.values().any(|s| s.slug == slug) {
            return Err(StorageError::Conflict(format!("scheme slug '{}' already taken", slug)));
        }

        let record = SchemeRecord {
            id: self.next_id(),
            name: name.to_string(),
            slug,
        };
        schemes.insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl InitiativeStorage for InMemoryStorage {
    async fn find_initiatives(&self, filter: &InitiativeFilter) -> StorageResult<Vec<Initiative>> {
        Ok(self
            .joined()
            .await
            .iter()
            .map(InitiativeRecord::flatten)
            .filter(|item| filter.matches(item))
            .collect())
    }

    async fn list_initiative_records(
        &self,
        query: &RecordQuery,
        page: PageRequest,
    ) -> StorageResult<Page<InitiativeRecord>> {
        let mut records: Vec<InitiativeRecord> = self
            .joined()
            .await
            .into_iter()
            .filter(|r| query.matches(r))
            .collect();
        records.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| a.state.name.cmp(&b.state.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page.apply(&records))
    }

    async fn get_initiative_record(&self, id: i64) -> StorageResult<Option<InitiativeRecord>> {
        let stored = {
            let initiatives = self.initiatives.read().await;
            match initiatives.get(&id) {
                Some(stored) => stored.clone(),
                None => return Ok(None),
            }
        };

        let states = self.states.read().await;
        let schemes = self.schemes.read().await;
        Ok(states
            .get(&stored.row.state_id)
            .zip(schemes.get(&stored.row.scheme_id))
            .map(|(state, scheme)| to_record(&stored, state, scheme)))
    }

    async fn insert_initiative(&self, initiative: NewInitiative) -> StorageResult<bool> {
        if !self.states.read().await.contains_key(&initiative.state_id) {
            return Err(StorageError::InvalidData(format!(
                "unknown state id {}",
                initiative.state_id
            )));
        }
        if !self.schemes.read().await.contains_key(&initiative.scheme_id) {
            return Err(StorageError::InvalidData(format!(
                "unknown scheme id {}",
                initiative.scheme_id
            )));
        }

        let mut initiatives = self.initiatives.write().await;
        let exists = initiatives.values().any(|stored| {
            stored.row.name == initiative.name
                && stored.row.state_id == initiative.state_id
                && stored.row.scheme_id == initiative.scheme_id
                && stored.row.year == initiative.year
        });
        if exists {
            return Ok(false);
        }

        let id = self.next_id();
        initiatives.insert(id, StoredInitiative { id, row: initiative });
        Ok(true)
    }

    async fn count_initiatives(&self) -> StorageResult<u64> {
        Ok(self.initiatives.read().await.len() as u64)
    }
}

#[async_trait]
impl ReportStorage for InMemoryStorage {
    async fn get_report(&self, report_id: &str) -> StorageResult<Option<Report>> {
        let reports = self.reports.read().await;
        Ok(reports.get(report_id).cloned())
    }

    async fn upsert_report(
        &self,
        report_id: &str,
        status: ReportStatus,
        params: Value,
    ) -> StorageResult<Report> {
        let mut reports = self.reports.write().await;
        let report = reports
            .entry(report_id.to_string())
            .and_modify(|existing| {
                existing.status = status;
                existing.params = params.clone();
            })
            .or_insert_with(|| Report {
                report_id: report_id.to_string(),
                status,
                params: params.clone(),
                created_at: Utc::now(),
            });
        Ok(report.clone())
    }

    async fn list_reports(&self, limit: usize) -> StorageResult<Vec<Report>> {
        let reports = self.reports.read().await;
        let mut all: Vec<Report> = reports.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.report_id.cmp(&b.report_id))
        });
        all.truncate(limit);
        Ok(all)
    }
}

impl Storage for InMemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::exercise_storage;

    #[tokio::test]
    async fn test_memory_storage_contract() {
        exercise_storage(&InMemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_parents() {
        let storage = InMemoryStorage::new();
        let result = storage
            .insert_initiative(NewInitiative {
                name: "orphan".to_string(),
                state_id: 42,
                scheme_id: 43,
                category: "Infrastructure".to_string(),
                year: 2024,
                status: "On Track".to_string(),
                progress: 0.5,
                schools_impacted: 1,
                students_impacted: 1,
                scholarships_awarded: 1,
                budget_utilized: 1.0,
            })
            .await;
        assert!(matches!(result, Err(StorageError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_slug_collision_is_a_conflict() {
        let storage = InMemoryStorage::new();
        storage.ensure_scheme("PM SHRI").await.unwrap();
        let result = storage.ensure_scheme("PM-SHRI").await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
    }
}
