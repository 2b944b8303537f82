//! Copy the synthetic dataset into the persisted store

use crate::storage::{NewInitiative, SchemeRecord, StateRecord, Storage, StorageResult};
use mhrd_core::catalog::{STATE_COORDINATES, SCHEMES};
use mhrd_core::Dataset;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of an import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub states: usize,
    pub schemes: usize,
    pub initiatives_created: usize,
}

/// Ensure every catalog state and scheme exists, then insert each synthetic
/// initiative whose natural key is not yet stored. Re-running creates nothing.
pub async fn import_demo_data(storage: &dyn Storage, dataset: &Dataset) -> StorageResult<ImportSummary> {
    let mut states: HashMap<&str, StateRecord> = HashMap::new();
    for (name, coords) in STATE_COORDINATES {
        let record = storage.ensure_state(name, Some(coords)).await?;
        states.insert(name, record);
    }

    let mut schemes: HashMap<&str, SchemeRecord> = HashMap::new();
    for name in SCHEMES {
        let record = storage.ensure_scheme(name).await?;
        schemes.insert(name, record);
    }

    let mut created = 0;
    for item in dataset.initiatives() {
        let (Some(state), Some(scheme)) = (
            states.get(item.state.as_str()),
            schemes.get(item.scheme.as_str()),
        ) else {
            tracing::debug!(name = %item.name, "Skipping initiative with uncatalogued state or scheme");
            continue;
        };

        if storage
            .insert_initiative(NewInitiative::from_initiative(item, state, scheme))
            .await?
        {
            created += 1;
        }
    }

    let summary = ImportSummary {
        states: states.len(),
        schemes: schemes.len(),
        initiatives_created: created,
    };
    tracing::info!(
        backend = storage.backend_name(),
        states = summary.states,
        schemes = summary.schemes,
        initiatives_created = summary.initiatives_created,
        "Imported demo data"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CatalogStorage, InMemoryStorage, InitiativeStorage, SqliteStorage};

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let storage = InMemoryStorage::new();
        let first = import_demo_data(&storage, Dataset::global()).await.unwrap();
        assert_eq!(first.states, 36);
        assert_eq!(first.schemes, 13);
        assert_eq!(first.initiatives_created, 1404);

        let second = import_demo_data(&storage, Dataset::global()).await.unwrap();
        assert_eq!(second.initiatives_created, 0);
        assert_eq!(storage.count_initiatives().await.unwrap(), 1404);
    }

    #[tokio::test]
    async fn test_import_into_sqlite() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let summary = import_demo_data(&storage, Dataset::global()).await.unwrap();
        assert_eq!(summary.initiatives_created, 1404);

        let states = storage.list_states().await.unwrap();
        assert_eq!(states.len(), 36);
        assert!(states.iter().all(|s| s.lat.is_some() && s.lng.is_some()));
    }
}
