//! Pricing gate (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 PRICING GATE                  │
//!   Client Request       │  ┌──────────┐    ┌──────────────────────────┐ │
//!   ─────────────────────┼─▶│   http   │───▶│ /global, /global/sync    │ │
//!                        │  │  server  │    │   routing table → cms    │ │
//!                        │  │          │    ├──────────────────────────┤ │
//!                        │  │          │───▶│ /api/pricing/status      │ │
//!                        │  └──────────┘    │   pricing verifier       │ │
//!                        │                  └──────────────────────────┘ │
//!                        │  ┌──────────────────────────────────────────┐ │
//!                        │  │ config · i18n · observability · lifecycle │ │
//!                        │  └──────────────────────────────────────────┘ │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use pricing_gate::lifecycle::{signals, startup};
use pricing_gate::{HttpServer, Shutdown};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = startup::config_path(
        std::env::args().nth(1),
        std::env::var(startup::CONFIG_PATH_ENV).ok(),
    );

    // Validation errors are already logged individually.
    let config = startup::prepare(path.as_deref())?;

    tracing::info!("pricing-gate v{} starting", env!("CARGO_PKG_VERSION"));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
