//! Plot API server.
//!
//! Looks up Polish land parcels and buildings by ID on the municipal WFS
//! service responsible for the ID's TERYT code.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use plot_api::config::ServiceConfig;
use plot_api::registry::Registry;
use plot_api::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "plot-api")]
#[command(about = "Polish land parcel and building search API")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "PLOT_API_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Service configuration file
    #[arg(long, default_value = "config/plot-api.yaml", env = "PLOT_API_CONFIG")]
    config: PathBuf,

    /// WFS registry file (`id;organizacja;teryt;url`)
    #[arg(long, default_value = "data/dane_WFS.txt", env = "PLOT_API_REGISTRY")]
    registry: PathBuf,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "PLOT_API_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;
    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting plot API server");

    let config = ServiceConfig::load(&args.config)?;
    let registry = Registry::load(&args.registry)?;
    let state = Arc::new(AppState::new(config, registry)?);

    let app = plot_api::router(state, prometheus_handle);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
