//! MHRD Daemon library
//!
//! This module provides the serving side of the MHRD dashboard:
//! - REST API handlers and page contexts
//! - Storage backends (in-memory and SQLite)
//! - Persisted-first initiative resolution
//! - Report registry and demo data import
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod registry;
pub mod server;
pub mod source;
pub mod storage;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, StorageError};
pub use import::{import_demo_data, ImportSummary};
pub use registry::ReportRegistry;
pub use server::Server;
pub use source::InitiativeResolver;
pub use storage::{InMemoryStorage, SqliteStorage, Storage};
