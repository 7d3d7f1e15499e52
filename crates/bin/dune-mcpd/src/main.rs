//! Daemon entry point for the Dune Sim MCP server.
//!
//! Loads `.env` and configuration, installs logging on stderr, builds the Sim
//! client, and serves MCP over stdio or streamable HTTP.

mod client;
mod config;

use dune_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::client::build_control_plane;
use crate::config::{DuneConfig, McpTransport};

const DEFAULT_LOG_FILTER: &str = "dune_mcp=info,dune_core=info,dune_mcpd=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = DuneConfig::from_args()?;
    info!(
        transport = ?config.transport,
        sim_base_url = %config.sim_base_url,
        request_timeout_secs = config.request_timeout.as_secs(),
        "starting dune-mcpd"
    );

    let control = build_control_plane(&config)?;
    match config.transport {
        McpTransport::Stdio => serve_stdio(control).await,
        McpTransport::Http => {
            let http_config = McpHttpServerConfig::new(config.mcp_http_addr)
                .with_stateful_mode(config.stateful);
            serve_streamable_http(control, http_config).await
        }
    }
}

/// Logs go to stderr; stdout carries the stdio transport.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
