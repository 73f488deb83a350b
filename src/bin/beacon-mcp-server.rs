// ABOUTME: Beacon MCP server binary
// ABOUTME: Parses flags, initializes tracing, wires resources, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Beacon Labs

//! # Beacon MCP Server
//!
//! Serves the MCP endpoint, settings API, and health check over HTTP.
//!
//! ```bash
//! # Run with environment defaults
//! cargo run --bin beacon-mcp-server
//!
//! # Override the listen port and settings store
//! cargo run --bin beacon-mcp-server -- --port 8080 --database-url sqlite:./data/settings.db
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use beacon_mcp_server::config::ServerConfig;
use beacon_mcp_server::mcp::resources::ServerResources;
use beacon_mcp_server::routes;

#[derive(Parser)]
#[command(
    name = "beacon-mcp-server",
    about = "Beacon MCP Server",
    long_about = "Scope-gated MCP tools backed by identity-brokered outbound tokens",
    version
)]
struct Args {
    /// HTTP listen port (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Settings store URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = Some(database_url);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let resources = Arc::new(ServerResources::from_config(config).await?);
    let app = routes::router(resources);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "beacon MCP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("beacon MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
