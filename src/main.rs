//! Priority Classification Proxy (v1)
//!
//! A reverse proxy that labels every request by priority under load and
//! routes it accordingly, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌────────────────────────────────────────────────┐
//!                     │                PRIORITY PROXY                   │
//!                     │                                                 │
//!   Client Request    │  ┌─────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│ classify │──▶│   routing   │  │
//!                     │  │ server  │   │ (policy) │   │ (label→act) │  │
//!                     │  └─────────┘   └────┬─────┘   └──────┬──────┘  │
//!                     │                     │                │         │
//!                     │              ┌──────┴─────┐   ┌──────┴──────┐  │
//!                     │              │    load    │   │  upstream   │  │
//!                     │              │  (gauge)   │   │   pools     │  │
//!                     │              └────────────┘   └──────┬──────┘  │
//!                     │                                       │        │
//!   Client Response   │  ┌──────────────────────────┐         │        │
//!   ◀─────────────────┼──│ label header + response  │◀────────┼────────┼── Upstream
//!                     │  └──────────────────────────┘         │        │    Server
//!                     │                                                 │
//!                     │  config · observability · lifecycle             │
//!                     └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use priority_proxy::config::{self, ProxyConfig};
use priority_proxy::http::HttpServer;
use priority_proxy::lifecycle::Shutdown;
use priority_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "priority-proxy")]
#[command(about = "Priority classification reverse proxy", version)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A bad configuration is fatal here, before any traffic is served.
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => {
            let config = ProxyConfig::default();
            config::validate_config(&config).map_err(config::ConfigError::Validation)?;
            config
        }
    };

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.policy.mode,
        threshold = config.policy.threshold,
        variable = %config.variable.name,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.listen_for_ctrl_c());

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
