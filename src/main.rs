//! Edge gate
//!
//! Intercepts every page request in front of the renderer.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────────────┐
//!                         │                     EDGE GATE                      │
//!                         │                                                    │
//!     Client Request      │  ┌─────────┐   ┌──────────┐   ┌────────────────┐   │
//!     ────────────────────┼─▶│  http   │──▶│ session  │──▶│ routing policy │   │
//!                         │  │ server  │   │ refresh  │   │                │   │
//!                         │  └─────────┘   └────┬─────┘   └───────┬────────┘   │      Identity
//!                         │                     │ ◀───────────────┼────────────┼───── Provider
//!                         │                     │        allow    ▼ redirect   │
//!                         │                     │        ┌──────────────┐      │
//!                         │                     │        │    locale    │      │
//!                         │                     │        │   resolver   │      │
//!                         │                     ▼        └──────┬───────┘      │
//!     Client Response     │  ┌──────────┐   ┌─────────┐         │              │
//!     ◀───────────────────┼──│ response │◀──│  merge  │◀────────┘              │
//!                         │  │  render  │   └─────────┘ ─── continue ──────────┼───▶ Renderer
//!                         │  └──────────┘                                      │
//!                         └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gate::http::HttpServer;
use edge_gate::lifecycle::{signals, startup, Shutdown};
use edge_gate::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "edge-gate")]
#[command(about = "Session, access and locale interceptor for page requests", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "EDGE_GATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = startup::resolve_config(args.config.as_deref())?;

    logging::init(&config.observability);
    tracing::info!("edge-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_locale = %config.locales.default_locale,
        supported_locales = ?config.locales.supported,
        prefix_strategy = ?config.locales.prefix_strategy,
        match_mode = ?config.routes.match_mode,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
