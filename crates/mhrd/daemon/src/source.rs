//! Initiative sources and the persisted-first resolver
//!
//! Every dashboard computation starts from a filtered initiative collection.
//! The resolver asks the persisted store first and uses its answer only when
//! the query succeeds with at least one row; otherwise the synthetic dataset
//! answers. Store failures are logged, never returned.

use crate::storage::{Storage, StorageResult};
use async_trait::async_trait;
use mhrd_core::{filter_initiatives, Dataset, Initiative, InitiativeFilter};
use std::sync::Arc;

/// Anything that can answer a filtered initiative query
#[async_trait]
pub trait InitiativeSource: Send + Sync {
    /// Source name used in logs
    fn name(&self) -> &'static str;

    async fn initiatives(&self, filter: &InitiativeFilter) -> StorageResult<Vec<Initiative>>;
}

/// The process-wide synthetic dataset
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSource {
    dataset: &'static Dataset,
}

impl SyntheticSource {
    pub fn new(dataset: &'static Dataset) -> Self {
        Self { dataset }
    }

    pub fn filter(&self, filter: &InitiativeFilter) -> Vec<Initiative> {
        filter_initiatives(self.dataset.initiatives(), filter)
    }
}

#[async_trait]
impl InitiativeSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn initiatives(&self, filter: &InitiativeFilter) -> StorageResult<Vec<Initiative>> {
        Ok(self.filter(filter))
    }
}

/// Initiatives read back from the configured store
#[derive(Clone)]
pub struct PersistedSource {
    storage: Arc<dyn Storage>,
}

impl PersistedSource {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl InitiativeSource for PersistedSource {
    fn name(&self) -> &'static str {
        self.storage.backend_name()
    }

    async fn initiatives(&self, filter: &InitiativeFilter) -> StorageResult<Vec<Initiative>> {
        self.storage.find_initiatives(filter).await
    }
}

/// Persisted store first, synthetic dataset as fallback
#[derive(Clone)]
pub struct InitiativeResolver {
    persisted: Option<Arc<dyn InitiativeSource>>,
    synthetic: SyntheticSource,
}

impl InitiativeResolver {
    /// Resolver that only ever reads the synthetic dataset
    pub fn synthetic_only(dataset: &'static Dataset) -> Self {
        Self {
            persisted: None,
            synthetic: SyntheticSource::new(dataset),
        }
    }

    pub fn with_persisted(persisted: Arc<dyn InitiativeSource>, dataset: &'static Dataset) -> Self {
        Self {
            persisted: Some(persisted),
            synthetic: SyntheticSource::new(dataset),
        }
    }

    pub fn dataset(&self) -> &'static Dataset {
        self.synthetic.dataset
    }

    /// Never fails; an erroring or empty store yields synthetic results.
    pub async fn resolve(&self, filter: &InitiativeFilter) -> Vec<Initiative> {
        if let Some(persisted) = &self.persisted {
            match persisted.initiatives(filter).await {
                Ok(found) if !found.is_empty() => {
                    tracing::debug!(
                        source = persisted.name(),
                        count = found.len(),
                        "Resolved initiatives from store"
                    );
                    return found;
                }
                Ok(_) => {
                    tracing::debug!(source = persisted.name(), "Store returned no rows, using synthetic data");
                }
                Err(e) => {
                    tracing::warn!(
                        source = persisted.name(),
                        error = %e,
                        "Store query failed, using synthetic data"
                    );
                }
            }
        }

        self.synthetic.filter(filter)
    }
}
