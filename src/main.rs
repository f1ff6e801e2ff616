//! indexd server
//!
//! Serves positional lookups over a periodically refreshed sorted dataset.

use clap::{Arg, Command};
use indexd::api::{start_metrics_server, start_server, AppState};
use indexd::core::config::{parse_duration, Config};
use indexd::index::IndexManager;
use indexd::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("indexd")
        .version(indexd::VERSION)
        .about("Positional lookup service over a periodically refreshed sorted dataset.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("http-addr")
                .long("http-addr")
                .value_name("ADDR")
                .help("HTTP server bind address"),
        )
        .arg(
            Arg::new("metrics-addr")
                .long("metrics-addr")
                .value_name("ADDR")
                .help("Metrics server bind address"),
        )
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .value_name("FILE")
                .help("Dataset file path"),
        )
        .arg(
            Arg::new("refresh-interval")
                .long("refresh-interval")
                .value_name("DURATION")
                .help("Snapshot refresh interval (e.g. 60m, 30s)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .get_matches();

    // Load configuration
    let mut config = if let Some(config_path) = matches.get_one::<String>("config") {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    // Initialize logging and metrics
    indexd::init(&config.logging.level)?;

    info!("Starting indexd v{}", env!("CARGO_PKG_VERSION"));

    // Initial synchronous build. A failure is surfaced but not fatal: the
    // manager serves not-found from an empty snapshot until a background
    // refresh succeeds.
    let index = Arc::new(IndexManager::new(&config.dataset));
    match index.refresh().await {
        Ok(()) => info!("index loaded"),
        Err(err) => error!(
            error = %err,
            "index loaded with errors (missing dataset?), serving degraded until a refresh succeeds"
        ),
    }

    // The refresh loop owns the snapshot for the rest of the process
    let refresh = Arc::clone(&index).spawn_refresh();

    let state = AppState {
        index: Arc::clone(&index),
        started_at: std::time::Instant::now(),
    };

    // Start servers concurrently
    let mut server_handles = Vec::new();
    {
        let addr = config.server.http_addr;
        let state = state.clone();
        server_handles.push(ServerHandle {
            name: "API",
            handle: tokio::spawn(async move { start_server(addr, state).await }),
        });
    }
    if config.metrics.enabled {
        let addr = config.metrics.metrics_addr;
        server_handles.push(ServerHandle {
            name: "Metrics",
            handle: tokio::spawn(async move { start_metrics_server(addr).await }),
        });
    }

    // Wait for shutdown signal
    shutdown_signal().await;
    warn!("Received shutdown signal, initiating graceful shutdown...");

    // Stop the refresh loop first; an in-flight publish completes
    refresh.stop().await;

    for server in server_handles {
        info!("Shutting down {} server...", server.name);
        server.handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}

/// Server handle for graceful shutdown
struct ServerHandle {
    name: &'static str,
    handle: tokio::task::JoinHandle<Result<()>>,
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &clap::ArgMatches) -> Result<()> {
    if let Some(addr) = matches.get_one::<String>("http-addr") {
        config.server.http_addr = addr
            .parse()
            .map_err(|e| indexd::Error::config(format!("Invalid HTTP address: {}", e)))?;
    }

    if let Some(addr) = matches.get_one::<String>("metrics-addr") {
        config.metrics.metrics_addr = addr
            .parse()
            .map_err(|e| indexd::Error::config(format!("Invalid metrics address: {}", e)))?;
    }

    if let Some(dataset) = matches.get_one::<String>("dataset") {
        config.dataset.path = dataset.into();
    }

    if let Some(interval) = matches.get_one::<String>("refresh-interval") {
        config.dataset.refresh_interval = parse_duration(interval)
            .map_err(|e| indexd::Error::config(format!("Invalid refresh interval: {}", e)))?;
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
