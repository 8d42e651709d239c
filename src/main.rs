mod api;
mod config;
mod counter;
mod error;
mod frontend;
mod reporter;
mod server;
mod service;
mod store;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{Config, LogConfig};
use reporter::StatsReporter;
use server::Server;
use service::DataService;

/// In-memory key-value store with an HTTP API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `server_addr`
    #[arg(long)]
    addr: Option<String>,

    /// Seconds between status lines, overrides `report_interval_secs`
    #[arg(long)]
    report_interval: Option<u64>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(addr) = &self.addr {
            config.server_addr = addr.clone();
        }
        if let Some(secs) = self.report_interval {
            config.report_interval_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .with_context(|| format!("invalid log level '{}'", log.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file '{}'", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging(&config.log)?;

    info!("Starting memkv - in-memory key-value store");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let service = Arc::new(DataService::new());
    let shutdown = CancellationToken::new();

    let server = Server::bind(config.socket_addr()?, Arc::clone(&service))
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr))?;
    info!("Server listening on: {}", server.local_addr());

    let reporter = StatsReporter::new(
        Arc::clone(&service),
        config.report_interval(),
        shutdown.child_token(),
    )
    .spawn();
    info!(state = ?reporter.state(), "Background worker spawned");

    let mut server = tokio::spawn(server.run(shutdown.clone(), config.shutdown_timeout()));

    let finished = tokio::select! {
        res = &mut server => Some(res),
        _ = shutdown_signal() => None,
    };
    let result = match finished {
        Some(res) => {
            shutdown.cancel();
            res
        }
        None => {
            info!("Shutdown signal received");
            shutdown.cancel();
            server.await
        }
    };

    if let Err(e) = reporter.join().await {
        error!("Background worker failed: {}", e);
    }

    server_outcome(result)?;
    info!("Server stopped gracefully");
    Ok(())
}

/// Turn the joined server task into the process result
fn server_outcome(result: Result<std::io::Result<()>, JoinError>) -> anyhow::Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("Server error: {}", e);
            Err(anyhow::Error::new(e).context("server error"))
        }
        Err(e) => {
            error!("Server task failed: {}", e);
            Err(anyhow::Error::new(e).context("server task failed"))
        }
    }
}
