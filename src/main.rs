//! Chaincode gateway (v1)
//!
//! HTTP front end over a Fabric client SDK.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                 CHAINCODE GATEWAY                 │
//!   Client Request    │  ┌────────┐    ┌─────────────┐    ┌───────────┐  │
//!   ──────────────────┼─▶│  http  │───▶│ coordinator │───▶│  fabric   │──┼──▶ SDK gateway
//!                     │  │ server │    │   policy    │    │ rest.rs   │  │    (peers, orderer)
//!   Result envelope   │  └────────┘    └─────────────┘    └───────────┘  │
//!   ◀─────────────────┼──────────────────────┘                            │
//!                     │  config · observability · lifecycle               │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use chaincode_gateway::config::{load_config, GatewayConfig};
use chaincode_gateway::fabric::RestClient;
use chaincode_gateway::observability::{logging, metrics};
use chaincode_gateway::{EndorsementCoordinator, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "chaincode-gateway")]
#[command(about = "HTTP gateway for chaincode queries and transactions", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("chaincode-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        org = %config.network.org,
        channel = %config.network.channel_name,
        chaincode = %config.network.chaincode_name,
        targets = ?config.network.targets,
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

    let client = RestClient::new(&config.network, &config.sdk)?;
    let coordinator = EndorsementCoordinator::new(client, config.network.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    HttpServer::new(config, coordinator)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
