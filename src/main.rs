//! API Gateway
//!
//! Routes `/api/v1/*` traffic to backend services by path prefix.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                     API GATEWAY                      │
//!                     │                                                      │
//!   Client Request    │  ┌────────────┐   ┌────────┐   ┌──────────────────┐  │
//!   ──────────────────┼─▶│ access log │──▶│  cors  │──▶│  /health         │  │
//!                     │  │   span     │   │        │   │  /services       │  │
//!                     │  └────────────┘   └────────┘   │  else: matcher   │  │
//!                     │                                └────────┬─────────┘  │
//!                     │                                         ▼            │
//!                     │                                ┌──────────────────┐  │
//!                     │                                │ service registry │  │
//!                     │                                └────────┬─────────┘  │
//!                     │                                         ▼            │
//!   Client Response   │                                ┌──────────────────┐  │
//!   ◀─────────────────┼────────────────────────────────│    dispatcher    │◀─┼── Upstream
//!                     │                                └──────────────────┘  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::config::{load_config, validate_config, GatewayConfig, LoadError};
use api_gateway::lifecycle::{shutdown_signal, Shutdown};
use api_gateway::observability::{init_logging, metrics};
use api_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Path-prefix API gateway for backend microservices", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when absent.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long, env = "GATEWAY_BIND")]
    bind: Option<String>,
}

fn resolve_config(args: &Args) -> Result<GatewayConfig, LoadError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
    }
    validate_config(&config).map_err(LoadError::Validation)?;

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    init_logging(&config.observability);

    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = config.services.len(),
        upstream_timeout_ms = config.timeouts.upstream_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
