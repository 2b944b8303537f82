//! Storage trait definitions

use super::records::{
    InitiativeRecord, NewInitiative, Page, PageRequest, RecordQuery, SchemeRecord, StateRecord,
};
use async_trait::async_trait;
use mhrd_core::{Coordinates, Initiative, InitiativeFilter, Report, ReportStatus};
use serde_json::Value;

pub use crate::error::StorageResult;

/// Combined storage trait
#[async_trait]
pub trait Storage: CatalogStorage + InitiativeStorage + ReportStorage + Send + Sync {
    /// Short backend name (`memory`, `sqlite`)
    fn backend_name(&self) -> &'static str;
}

/// Storage for states and schemes
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// List all states ordered by name
    async fn list_states(&self) -> StorageResult<Vec<StateRecord>>;

    /// Get a state by ID
    async fn get_state(&self, id: i64) -> StorageResult<Option<StateRecord>>;

    /// Get or create a state by name; fills coordinates that are missing
    async fn ensure_state(
        &self,
        name: &str,
        coordinates: Option<Coordinates>,
    ) -> StorageResult<StateRecord>;

    /// List all schemes ordered by name
    async fn list_schemes(&self) -> StorageResult<Vec<SchemeRecord>>;

    /// Get a scheme by ID
    async fn get_scheme(&self, id: i64) -> StorageResult<Option<SchemeRecord>>;

    /// Get or create a scheme by name
    async fn ensure_scheme(&self, name: &str) -> StorageResult<SchemeRecord>;
}

/// Storage for initiatives
#[async_trait]
pub trait InitiativeStorage: Send + Sync {
    /// Exact-name filtering, flat shape, ordered by ID
    async fn find_initiatives(&self, filter: &InitiativeFilter) -> StorageResult<Vec<Initiative>>;

    /// Paginated listing ordered by year descending, then state name
    async fn list_initiative_records(
        &self,
        query: &RecordQuery,
        page: PageRequest,
    ) -> StorageResult<Page<InitiativeRecord>>;

    /// Get an initiative by ID
    async fn get_initiative_record(&self, id: i64) -> StorageResult<Option<InitiativeRecord>>;

    /// Insert unless the natural key exists. Returns whether a row was created.
    async fn insert_initiative(&self, initiative: NewInitiative) -> StorageResult<bool>;

    /// Number of stored initiatives
    async fn count_initiatives(&self) -> StorageResult<u64>;
}

/// Storage for generated reports
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Get a report by its report ID
    async fn get_report(&self, report_id: &str) -> StorageResult<Option<Report>>;

    /// Create or refresh a report; `created_at` is kept on update
    async fn upsert_report(
        &self,
        report_id: &str,
        status: ReportStatus,
        params: Value,
    ) -> StorageResult<Report>;

    /// Most recent reports first
    async fn list_reports(&self, limit: usize) -> StorageResult<Vec<Report>>;
}
