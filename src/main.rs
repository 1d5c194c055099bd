//! Booking relay
//!
//! A small HTTP service that validates booking requests and relays them as
//! email through an SMTP server.
//!
//! # Architecture Overview
//!
//! ```text
//!  Client ──▶ request id ─▶ trace ─▶ security headers ─▶ body limit ─▶ CORS
//!                                                                        │
//!                      ┌─────────────────────────────────────────────────┘
//!                      ▼
//!               /api/book: rate limiter ─▶ validator ─▶ composer ─▶ dispatcher ──▶ SMTP relay
//!               /health:   timestamp
//!               otherwise: 404
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;

use booking_relay::config::{self, LogFormat};
use booking_relay::lifecycle::{trigger_on_signal, Shutdown};
use booking_relay::observability::logging;
use booking_relay::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = config::from_env();
    logging::init(
        loaded
            .as_ref()
            .map(|c| c.observability.log_format)
            .unwrap_or(LogFormat::Pretty),
    );

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "booking-relay starting");

    let config = loaded.inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;
    tracing::info!(
        port = config.listener.port,
        cors_origin = %config.listener.cors_origin,
        max_body_bytes = config.listener.max_body_bytes,
        rate_limit_max = config.rate_limit.max_requests,
        rate_limit_window_secs = config.rate_limit.window.as_secs(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let port = listener.local_addr()?.port();

    let server = HttpServer::new(config);

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = Arc::clone(&shutdown);
    tokio::spawn(async move {
        trigger_on_signal(&signal_shutdown).await;
    });

    tracing::info!("API ready on http://localhost:{}", port);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
