use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use ltcx_rs::api::{create_router, AppState};
use ltcx_rs::app::build_service;
use ltcx_rs::config::Settings;
use ltcx_rs::market_data::store::RecordStore;
use ltcx_rs::telemetry;

#[derive(Debug, Parser)]
#[command(name = "ltcx", version, about = "LTC exchange market-data API")]
struct Cli {
    /// TOML settings file; missing is fine
    #[arg(long, default_value = "ltcx.toml")]
    config: PathBuf,

    /// Overrides server.port
    #[arg(long)]
    port: Option<u16>,

    /// Prometheus exporter port (metrics-exporter feature only)
    #[arg(long, default_value_t = 9000)]
    metrics_port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    telemetry::init_tracing(&settings.logging.level);
    telemetry::init_metrics(cli.metrics_port)?;

    let store = Arc::new(RecordStore::new());
    let service = Arc::new(build_service(&settings, store).context("building market service")?);
    let app = create_router(AppState::new(service));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
    }
}
