//! Application state for API handlers

use crate::registry::ReportRegistry;
use crate::source::{InitiativeResolver, PersistedSource};
use crate::storage::Storage;
use mhrd_core::{Dataset, DashboardPayload, FilterParams, Initiative, InitiativeFilter};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub storage: Arc<dyn Storage>,

    /// Persisted-first initiative resolution
    pub resolver: Arc<InitiativeResolver>,

    /// Report registry
    pub registry: Arc<ReportRegistry>,

    /// Synthetic dataset
    pub dataset: &'static Dataset,

    /// Daemon version
    pub version: String,

    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(storage: Arc<dyn Storage>, dataset: &'static Dataset) -> Self {
        let persisted = Arc::new(PersistedSource::new(storage.clone()));
        Self {
            resolver: Arc::new(InitiativeResolver::with_persisted(persisted, dataset)),
            registry: Arc::new(ReportRegistry::new(storage.clone())),
            storage,
            dataset,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }

    /// Filtered initiatives for raw query parameters
    pub async fn initiatives(&self, params: &FilterParams) -> Vec<Initiative> {
        self.resolver
            .resolve(&InitiativeFilter::from_params(params))
            .await
    }

    /// Full dashboard payload for raw query parameters
    pub async fn dashboard(&self, params: &FilterParams) -> DashboardPayload {
        let initiatives = self.initiatives(params).await;
        DashboardPayload::assemble(initiatives, params, self.dataset)
    }
}
