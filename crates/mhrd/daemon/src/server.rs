//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::{DaemonConfig, StorageConfig};
use crate::error::{DaemonError, DaemonResult};
use crate::import::import_demo_data;
use crate::storage::{self, InMemoryStorage, Storage};
use axum::Router;
use mhrd_core::Dataset;
use std::sync::Arc;
use tokio::net::TcpListener;

/// MHRD dashboard server
pub struct Server {
    config: DaemonConfig,
    storage: Arc<dyn Storage>,
    dataset: &'static Dataset,
}

impl Server {
    /// Open storage and prepare the server.
    ///
    /// A store that cannot be opened is replaced by the in-memory backend;
    /// the synthetic dataset then answers every request.
    pub async fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let storage = match storage::open(&config.storage).await {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!(
                    backend = config.storage.backend_name(),
                    error = %e,
                    "Failed to open store, falling back to in-memory storage"
                );
                Arc::new(InMemoryStorage::new()) as Arc<dyn Storage>
            }
        };

        let dataset = Dataset::global();

        if config.dataset.import_on_startup {
            match import_demo_data(storage.as_ref(), dataset).await {
                Ok(summary) => tracing::info!(
                    states = summary.states,
                    schemes = summary.schemes,
                    created = summary.initiatives_created,
                    "Imported demo data"
                ),
                Err(e) => tracing::warn!(error = %e, "Demo data import failed"),
            }
        }

        Ok(Self {
            config,
            storage,
            dataset,
        })
    }

    /// Storage backend in use
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Router with fresh application state
    pub fn router(&self) -> Router {
        let state = AppState::new(self.storage.clone(), self.dataset);
        create_router(state, &self.config.server)
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = self.router();

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("MHRD dashboard listening on {}", addr);
        tracing::info!(
            backend = self.storage.backend_name(),
            cors = self.config.server.enable_cors,
            "Storage backend ready"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("MHRD dashboard shutting down");

        Ok(())
    }
}

/// Open the configured store for a one-off command. Unlike [`Server::new`]
/// there is no fallback: an in-memory import would be lost on exit.
pub async fn open_store_strict(config: &StorageConfig) -> DaemonResult<Arc<dyn Storage>> {
    if matches!(config, StorageConfig::Memory) {
        tracing::warn!("Storage backend is in-memory; imported rows will not outlive this process");
    }
    Ok(storage::open(config).await?)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unreachable_store_falls_back_to_memory() {
        let config = DaemonConfig {
            storage: StorageConfig::sqlite("sqlite:///nonexistent-dir/deeper/mhrd.db"),
            ..DaemonConfig::default()
        };
        let server = Server::new(config).await.unwrap();
        assert_eq!(server.storage().backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_import_on_startup() {
        let mut config = DaemonConfig::default();
        config.dataset.import_on_startup = true;

        let server = Server::new(config).await.unwrap();
        assert_eq!(server.storage().count_initiatives().await.unwrap(), 1404);

        let response = server
            .router()
            .oneshot(Request::builder().uri("/api/v1/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let status: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(status["persisted_initiatives"], 1404);
        assert_eq!(status["storage_backend"], "memory");
    }

    #[tokio::test]
    async fn test_strict_open_reports_failure() {
        let result = open_store_strict(&StorageConfig::sqlite("sqlite:///nonexistent-dir/deeper/mhrd.db")).await;
        assert!(matches!(result, Err(DaemonError::Storage(_))));
    }
}
