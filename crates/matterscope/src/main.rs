use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use matterscope::api;
use matterscope::api::AppState;
use matterscope::config::format_diagnostics;
use matterscope::config::Config;
use matterscope::ingest;
use matterscope::store::DeviceStore;
use matterscope_registry::CategoryTable;
use matterscope_registry::Registry;
use tracing_subscriber::prelude::*;

/// Matter device capability browser and comparison daemon.
#[derive(Debug, Parser)]
#[command(name = "matterscope", version)]
struct Args {
    /// Configuration files, merged first-wins.
    #[arg(long = "config", default_value = "matterscope.toml")]
    config: Vec<PathBuf>,

    /// Override the listen address from the config.
    #[arg(long)]
    listen: Option<String>,

    /// Override the listen port from the config.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration; warnings still print when loading succeeds.
    let (config, diagnostics) =
        Config::from_files(&args.config).map_err(|e| anyhow::anyhow!("{}", e))?;
    if !diagnostics.is_empty() {
        eprintln!("{}", format_diagnostics(&diagnostics));
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(config.logging.targets())
        .init();

    tracing::info!("matterscope starting");

    let store = Arc::new(DeviceStore::new());
    let registry = Arc::new(Registry::standard());

    let ingest_handles = ingest::spawn_sources_from_config(&ingest::IngestContext {
        config: &config,
        store: store.clone(),
    });
    tracing::info!("{} ingest source(s) running", ingest_handles.len());

    let state = Arc::new(AppState {
        store: store.clone(),
        registry,
        categories: CategoryTable::default(),
        weights: config.scoring.weights(),
        version: env!("CARGO_PKG_VERSION"),
    });

    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());
    let port = args.port.unwrap_or(config.server.port);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let server = tokio::spawn(async move {
        if let Err(e) = api::serve(listen, port, state, shutdown_rx).await {
            tracing::error!("HTTP API server failed: {}", e);
        }
    });

    // Wait for Ctrl+C
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received shutdown signal");
        }
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
    }

    shutdown_tx.send(()).ok();
    server.await.ok();

    for handle in ingest_handles {
        handle.abort();
    }

    tracing::info!("matterscope shutdown complete");

    Ok(())
}
