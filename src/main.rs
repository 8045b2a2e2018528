//! Hop relay server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ Hop₁ ──▶ Hop₂ ──▶ … ──▶ Hopₙ ──▶ Generation Service
//!     ▲                                  │
//!     └──── Hop₁ ◀──── Hop₂ ◀──── … ◀────┘   (X-Direction: return)
//!
//!   each hop:  envelope → append chain/log → dispatch(direction)
//!              → relay to neighbour | call service | summarize
//! ```
//!
//! Configuration comes from an optional TOML file (`--config`) overridden
//! by `HOP_NAME`, `NEXT_HOP_URL`, `PREV_HOP_URL`, `DELAY_MS`,
//! `OPENROUTER_API_KEY`, `OPENROUTER_MODEL` and friends.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use hop_relay::config::load_config;
use hop_relay::lifecycle::signals::shutdown_on_signal;
use hop_relay::net::tls::load_tls_config;
use hop_relay::observability::{logging, metrics};
use hop_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "hop-relay")]
#[command(about = "One hop of a header-propagated LLM relay chain", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("hop-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        hop = %config.hop.name,
        next_hop = config.hop.next_hop_url.as_deref().unwrap_or("-"),
        prev_hop = config.hop.prev_hop_url.as_deref().unwrap_or("-"),
        delay_ms = config.hop.delay_ms,
        terminal_forward = config.hop.is_terminal_forward(),
        origin = config.hop.is_origin(),
        outbound_timeout_secs = config.timeouts.outbound_secs,
        "Configuration loaded"
    );
    if config.hop.is_terminal_forward() && config.generation.api_key.is_none() {
        tracing::warn!("Terminal forward hop has no generation API key; forward requests will fail");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_on_signal(&signal_shutdown).await;
    });

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address.parse()?;
            let rustls = load_tls_config(&tls).await?;
            server.run_tls(addr, rustls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
