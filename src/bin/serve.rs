//! Serve the trained anomaly model over HTTP
//!
//! Loads the fitted scaler and isolation forest from the model store and
//! exposes POST /predict. Configuration comes from ANOMALY_* environment
//! variables; flags override them.
//!
//! Usage: cargo run --bin serve -- --model-dir models --port 3000

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;

use rust_anomaly_service::config::ServiceConfig;
use rust_anomaly_service::model::ModelStore;
use rust_anomaly_service::service::{app, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the trained anomaly model over HTTP")]
struct Args {
    /// Bind address (overrides ANOMALY_BIND)
    #[arg(short, long)]
    bind: Option<String>,

    /// Port (overrides ANOMALY_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Model store directory (overrides ANOMALY_MODEL_DIR)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = ServiceConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(model_dir) = args.model_dir {
        config.model_dir = model_dir;
    }

    let store = ModelStore::new(&config.model_dir);
    let state = AppState::load(&store)
        .with_context(|| format!("loading artifacts from {}", config.model_dir.display()))?;
    info!("loaded artifacts from {}", config.model_dir.display());

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .context("invalid bind address")?;

    println!("Anomaly prediction service listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("shutdown signal received, stopping");
}
