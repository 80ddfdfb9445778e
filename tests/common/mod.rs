//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use pricing_gate::{HttpServer, Shutdown, SiteConfig};
use tokio::net::TcpListener;

pub const SECRET: &str = "integration-secret";

/// Default config with a cookie secret and an ephemeral bind address.
pub fn test_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.pricing.cookie_secret = SECRET.to_string();
    config
}

/// Start a gate on an ephemeral port. Trigger the returned `Shutdown` to stop it.
#[allow(dead_code)]
pub async fn start_gate(config: SiteConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
