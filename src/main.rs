//! Catalog Proxy
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────────────┐
//!                        │                    CATALOG PROXY                      │
//!                        │                                                       │
//!   GET /api/catalog/    │  ┌─────────┐   ┌──────────┐   ┌────────────────────┐  │
//!   search?text=&page=   │  │  http   │──▶│ handler  │──▶│  catalog client    │──┼──▶ Upstream
//!   ─────────────────────┼─▶│ server  │   │          │   │  (full list fetch) │  │    catalog
//!                        │  └─────────┘   └────┬─────┘   └────────────────────┘  │    service
//!                        │                     │                                 │
//!                        │                     ▼                                 │
//!                        │               ┌──────────┐   ┌────────────────────┐   │
//!                        │               │pagination│──▶│ enrichment batches │───┼──▶ detail
//!                        │               │  window  │   │ (bounded, per-item │   │    fetches
//!                        │               └──────────┘   │  timeout)          │   │
//!   ◀────────────────────┼── { results, pagination }    └────────────────────┘   │
//!                        │                                                       │
//!                        │  config · observability · resilience · lifecycle      │
//!                        └───────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use catalog_proxy::config::{load_config, ProxyConfig};
use catalog_proxy::lifecycle::{signals, Shutdown};
use catalog_proxy::observability::{logging, metrics};
use catalog_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "catalog-proxy")]
#[command(about = "Paginating, enriching proxy for an upstream catalog service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("catalog-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        list_timeout_ms = config.timeouts.list_ms,
        detail_timeout_ms = config.timeouts.detail_ms,
        batch_size = config.enrichment.batch_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::trigger_on_signal(&signal_shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
