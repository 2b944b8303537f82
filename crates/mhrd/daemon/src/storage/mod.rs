//! Storage layer for mhrd-daemon
//!
//! Persists states, schemes, initiatives and generated reports. The
//! dashboard treats the store as optional: see [`crate::source`].

mod memory;
mod records;
mod sqlite;
mod traits;

pub use memory::InMemoryStorage;
pub use records::{
    InitiativeRecord, NewInitiative, Page, PageRequest, RecordQuery, SchemeRecord, StateRecord,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use sqlite::SqliteStorage;
pub use traits::{CatalogStorage, InitiativeStorage, ReportStorage, Storage, StorageResult};

use crate::config::StorageConfig;
use std::sync::Arc;

/// Open the configured backend
pub async fn open(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    match config {
        StorageConfig::Memory => Ok(Arc::new(InMemoryStorage::new())),
        StorageConfig::Sqlite {
            url,
            max_connections,
            connect_timeout_secs,
        } => {
            let storage = SqliteStorage::new(url, *max_connections, *connect_timeout_secs).await?;
            tracing::info!(url = %url, "Connected to SQLite store");
            Ok(Arc::new(storage))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mhrd_core::{catalog::coordinates_for, Dataset, InitiativeFilter, ReportStatus};
    use serde_json::json;

    async fn seed_kerala(storage: &dyn Storage) -> (StateRecord, SchemeRecord) {
        let state = storage
            .ensure_state("Kerala", coordinates_for("Kerala"))
            .await
            .unwrap();
        let scheme = storage.ensure_scheme("Samagra Shiksha").await.unwrap();
        (state, scheme)
    }

    /// Behaviour every backend must share
    pub(crate) async fn exercise_storage(storage: &dyn Storage) {
        // catalog get-or-create
        let (kerala, samagra) = seed_kerala(storage).await;
        assert_eq!(kerala.slug, "kerala");
        assert!(kerala.lat.is_some());
        let again = storage.ensure_state("Kerala", None).await.unwrap();
        assert_eq!(again.id, kerala.id);

        let goa = storage.ensure_state("Goa", None).await.unwrap();
        assert!(goa.lat.is_none());
        let goa = storage.ensure_state("Goa", coordinates_for("Goa")).await.unwrap();
        assert!(goa.lat.is_some());

        let states = storage.list_states().await.unwrap();
        assert_eq!(
            states.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["Goa", "Kerala"]
        );
        assert_eq!(storage.get_state(kerala.id).await.unwrap(), Some(kerala.clone()));
        assert_eq!(storage.get_state(-1).await.unwrap(), None);
        assert_eq!(
            storage.get_scheme(samagra.id).await.unwrap().map(|s| s.slug),
            Some("samagra-shiksha".to_string())
        );

        // natural-key deduplication
        let dataset = Dataset::global();
        let rows: Vec<_> = dataset
            .initiatives()
            .iter()
            .filter(|i| i.state == "Kerala" && i.scheme == "Samagra Shiksha")
            .collect();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            let created = storage
                .insert_initiative(NewInitiative::from_initiative(row, &kerala, &samagra))
                .await
                .unwrap();
            assert!(created);
        }
        let duplicate = storage
            .insert_initiative(NewInitiative::from_initiative(rows[0], &kerala, &samagra))
            .await
            .unwrap();
        assert!(!duplicate);
        assert_eq!(storage.count_initiatives().await.unwrap(), 3);

        // flat lookup by exact names
        let found = storage
            .find_initiatives(&InitiativeFilter::default().with_state("Kerala").with_year(2024))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].scheme, "Samagra Shiksha");
        assert_eq!(found[0].students_impacted, rows[1].students_impacted);
        let by_slug = storage
            .find_initiatives(&InitiativeFilter::default().with_state("kerala"))
            .await
            .unwrap();
        assert!(by_slug.is_empty());

        // record listing: slug match, year-desc order, pagination
        let query = RecordQuery {
            state: Some("kerala".to_string()),
            scheme: Some("Samagra Shiksha".to_string()),
            ..Default::default()
        };
        let page = storage
            .list_initiative_records(&query, PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.count, 3);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].year, 2025);
        assert_eq!(page.results[1].year, 2024);
        assert_eq!(page.results[0].state.name, "Kerala");

        let second = storage
            .list_initiative_records(&query, PageRequest::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(second.results.len(), 1);
        assert_eq!(second.results[0].year, 2023);

        let record = storage
            .get_initiative_record(second.results[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.scheme.name, "Samagra Shiksha");
        assert!(storage.get_initiative_record(-1).await.unwrap().is_none());

        // reports: created_at survives an update
        let first = storage
            .upsert_report("rpt_0000001", ReportStatus::Queued, json!({"state": "Goa"}))
            .await
            .unwrap();
        let refreshed = storage
            .upsert_report("rpt_0000001", ReportStatus::Ready, json!({"state": "Kerala"}))
            .await
            .unwrap();
        assert_eq!(refreshed.status, ReportStatus::Ready);
        assert_eq!(refreshed.params, json!({"state": "Kerala"}));
        assert_eq!(refreshed.created_at, first.created_at);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        storage
            .upsert_report("rpt_0000002", ReportStatus::Ready, json!({}))
            .await
            .unwrap();

        let recent = storage.list_reports(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].report_id, "rpt_0000002");
        assert_eq!(storage.list_reports(1).await.unwrap().len(), 1);
        assert!(storage.get_report("rpt_missing").await.unwrap().is_none());
    }
}
