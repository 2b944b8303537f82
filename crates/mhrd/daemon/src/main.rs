//! MHRD Daemon - education statistics dashboard service
//!
//! The MHRD daemon provides:
//! - JSON API for KPIs, trends, maps, search and comparisons
//! - CSV exports and a content-addressed report registry
//! - Read-only listing of persisted records
//! - Demo data import into a SQLite store

use anyhow::Context;
use clap::{Parser, Subcommand};
use mhrd_core::Dataset;
use mhrd_daemon::config::{DaemonConfig, StorageConfig};
use mhrd_daemon::error::{DaemonError, DaemonResult};
use mhrd_daemon::server::{open_store_strict, Server};
use mhrd_daemon::import_demo_data;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MHRD Daemon CLI
#[derive(Parser)]
#[command(name = "mhrdd")]
#[command(about = "MHRD Daemon - education statistics dashboard service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MHRD_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides configuration)
    #[arg(short, long, env = "MHRD_LISTEN_ADDR")]
    listen: Option<String>,

    /// SQLite database URL; selects the SQLite backend
    #[arg(long, env = "MHRD_DATABASE_URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(long, env = "MHRD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "MHRD_LOG_JSON")]
    json: bool,

    /// Import the synthetic dataset into the store before serving
    #[arg(long)]
    import: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Copy the synthetic dataset into the configured store and exit
    ImportDemoData,
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.to_string().into());

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn apply_overrides(config: &mut DaemonConfig, cli: &Cli) -> DaemonResult<()> {
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(url) = &cli.database_url {
        config.storage = StorageConfig::sqlite(url.clone());
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json {
        config.logging.json = true;
    }
    if cli.import {
        config.dataset.import_on_startup = true;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;
    apply_overrides(&mut config, &cli)?;

    init_tracing(&config.logging.level, config.logging.json);

    match cli.command.unwrap_or(Command::Serve) {
        Command::ImportDemoData => {
            let storage = open_store_strict(&config.storage).await?;
            let summary = import_demo_data(storage.as_ref(), Dataset::global())
                .await
                .context("Demo data import failed")?;
            tracing::info!(
                states = summary.states,
                schemes = summary.schemes,
                created = summary.initiatives_created,
                "Imported demo data"
            );
            println!(
                "Imported {} states, {} schemes, {} new initiatives",
                summary.states, summary.schemes, summary.initiatives_created
            );
            Ok(())
        }
        Command::Serve => {
            // Print startup banner
            println!(
                r#"
  __  __ _   _ ____  ____
 |  \/  | | | |  _ \|  _ \
 | |\/| | |_| | |_) | | | |
 | |  | |  _  |  _ <| |_| |
 |_|  |_|_| |_|_| \_\____/

  Education Statistics Dashboard
  Version: {}
  Storage: {}
  Listening: {}
"#,
                env!("CARGO_PKG_VERSION"),
                config.storage.backend_name(),
                config.server.listen_addr
            );

            let server = Server::new(config).await?;
            server.run().await?;
            Ok(())
        }
    }
}
