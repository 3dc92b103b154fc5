//! zmapi-relay
//!
//! A browser-impersonating download relay built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  DOWNLOAD RELAY                   │
//!                      │                                                   │
//!  GET /?url=…  ───────┼─▶ ┌─────────┐    ┌──────────┐    ┌───────────┐   │
//!                      │   │  http   │───▶│  relay   │───▶│ upstream  │───┼──▶ Upstream
//!                      │   │ server  │    │ request  │    │  fetch    │   │    Server
//!                      │   └─────────┘    └──────────┘    └─────┬─────┘   │
//!                      │                                        │         │
//!                      │                                        ▼         │
//!  Streamed /          │   ┌─────────┐    ┌──────────┐    ┌───────────┐   │
//!  inline body  ◀──────┼── │  relay  │◀───│  relay   │◀───│  relay    │   │
//!                      │   │ stream  │    │ headers  │    │ classify  │   │
//!                      │   └─────────┘    └──────────┘    └───────────┘   │
//!                      │                                                   │
//!                      │   Cross-cutting: config, observability, lifecycle │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use zmapi_relay::config;
use zmapi_relay::http::HttpServer;
use zmapi_relay::lifecycle::Shutdown;
use zmapi_relay::observability;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "zmapi-relay")]
#[command(about = "Browser-impersonating fetch and download relay")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = config::loader::load(args.config.as_deref(), args.port)?;

    observability::logging::init(&config.observability);

    tracing::info!("zmapi-relay v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        user_agent = %config.upstream.user_agent,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
