//! Quote Gateway
//!
//! A small web backend that proxies a quote API and a joke API behind one
//! JSON endpoint, built with Tokio, Axum and reqwest.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────┐
//!                    │                   QUOTE GATEWAY                    │
//!   GET /get_quote   │  ┌────────┐    ┌──────────────┐    ┌───────────┐  │
//!   ─────────────────┼─▶│  http  │───▶│   quoting    │───▶│ upstream  │──┼──▶ joke API
//!                    │  │ server │    │ QuoteGateway │    │  client   │──┼──▶ quote API
//!   JSON (always 200)│  └────────┘    └──────────────┘    └─────┬─────┘  │
//!   ◀────────────────┼───────────────────────────────────────── │        │
//!                    │                                          ▼        │
//!                    │  config · observability · lifecycle   resilience  │
//!                    │                                      retry/backoff│
//!                    └───────────────────────────────────────────────────┘
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use quote_gateway::config::{load_config, GatewayConfig};
use quote_gateway::http::HttpServer;
use quote_gateway::lifecycle::{signals, Shutdown};
use quote_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "quote-gateway")]
#[command(about = "Serve quotes and jokes from third-party APIs behind one JSON endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// IP address to bind, overrides the configured listener.
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind, overrides the configured listener.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,
}

fn apply_overrides(config: &mut GatewayConfig, cli: &Cli) -> Result<(), std::net::AddrParseError> {
    let mut addr: SocketAddr = config.listener.bind_address.parse()?;
    if let Some(host) = cli.host {
        addr.set_ip(host);
    }
    if let Some(port) = cli.port {
        addr.set_port(port);
    }
    config.listener.bind_address = addr.to_string();

    if cli.debug {
        config.observability.log_level = "debug".to_string();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    apply_overrides(&mut config, &cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("quote-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        joke_url = %config.upstreams.joke_url,
        quote_url = %config.upstreams.quote_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
