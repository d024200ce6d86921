//! CORS relay.
//!
//! A single-upstream reverse proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                   CORS RELAY                      │
//!                          │                                                   │
//!     Browser Request      │  ┌──────────┐   ┌───────────┐   ┌─────────────┐   │
//!     ─────────────────────┼─▶│  http    │──▶│ preflight │   │  request    │   │
//!                          │  │  server  │──▶│ (OPTIONS) │   │ transformer │───┼──▶ Upstream
//!                          │  └──────────┘   └───────────┘   └─────────────┘   │    Origin
//!                          │        ▲                                          │
//!     Browser Response     │  ┌─────┴────────────────────┐   ┌─────────────┐   │
//!     ◀────────────────────┼──│  response transformer    │◀──│  upstream   │◀──┼───
//!                          │  │  (cookies + CORS)        │   │  invoker    │   │
//!                          │  └──────────────────────────┘   └─────────────┘   │
//!                          │                                                   │
//!                          │  config · observability · lifecycle               │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{read_config, validate_config, ConfigError, RelayConfig};
use cors_relay::observability::{logging, metrics};
use cors_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "Single-upstream reverse proxy with CORS and login cookie rewriting")]
#[command(long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream origin, e.g. https://ecsc-expat.sy:8443 (overrides the file).
    #[arg(short, long)]
    upstream: Option<String>,

    /// Listen address, e.g. 0.0.0.0:8080 (overrides the file).
    #[arg(short, long)]
    bind: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => RelayConfig::default(),
        };

        if let Some(upstream) = self.upstream {
            config.upstream.url = upstream;
        }
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability)?;

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
