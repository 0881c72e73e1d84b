//! filemod-server - file modification tracker service
//!
//! Loads the config, starts the background workers and serves HTTP until
//! interrupted, then stops the workers before exiting.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use filemod_server::config::Config;
use filemod_server::logging;
use filemod_stat_collector::WalkDirCollector;
use filemod_worker::WorkerService;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Periodically snapshot file metadata and run submitted commands.
#[derive(Debug, Parser)]
#[command(name = "filemod-server", version)]
struct Cli {
    /// Path to config.yaml (default: search ., /etc/file-mod-tracker, ~/.file-mod-tracker).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured HTTP port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_path) =
        Config::load(cli.config.as_deref()).context("failed to load config")?;
    let _log_guard = logging::init_logging(&config.log_dir)?;

    info!("logger initialized");
    info!(path = %config_path.display(), "loaded config");
    if let Ok(cwd) = std::env::current_dir() {
        info!(dir = %cwd.display(), "current working directory");
    }

    let collector = Arc::new(WalkDirCollector::new(config.collector_config()));
    let service = Arc::new(WorkerService::new(config.worker_config(), collector));
    service.start().await;

    let port = cli.port.unwrap_or(config.server_port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(port, "starting HTTP server");

    let served = filemod_server::serve(listener, Arc::clone(&service), shutdown_signal()).await;

    service.stop().await;
    served.context("HTTP server failed")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received, shutting down"),
        Err(e) => {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
