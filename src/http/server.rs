//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware in a fixed order (security headers, body limit, CORS, rate limit)
//! - Tag requests with an `x-request-id` and trace them
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers::{book_handler, health_handler, not_found, AppState};
use crate::mail::Dispatcher;
use crate::security::{cors_layer, rate_limit_middleware, security_headers_middleware, RateLimiter};

/// HTTP server for the booking relay.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a server that delivers through the configured SMTP relay.
    ///
    /// Missing or unusable mail settings are logged here once; the booking
    /// route then answers 500 until the process is restarted with them set.
    ///
    /// Must be called inside a Tokio runtime: the pooled SMTP client spawns
    /// its connection reaper on construction.
    pub fn new(config: ServerConfig) -> Self {
        let dispatcher = match &config.mail {
            Ok(mail) => match Dispatcher::smtp(mail) {
                Ok(d) => Some(d),
                Err(e) => {
                    tracing::error!(error = %e, "Mail delivery disabled: invalid mail settings");
                    None
                }
            },
            Err(reason) => {
                tracing::error!(%reason, "Mail delivery disabled");
                None
            }
        };
        Self::with_dispatcher(config, dispatcher)
    }

    /// Create a server around an explicit dispatcher (or none).
    pub fn with_dispatcher(config: ServerConfig, dispatcher: Option<Dispatcher>) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        let state = AppState {
            dispatcher: dispatcher.map(Arc::new),
        };
        let router = Self::build_router(&config, state, Arc::clone(&limiter));

        Self {
            router,
            config: Arc::new(config),
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: request ID, trace, security headers,
    /// body limit, CORS, then the per-route rate limiter.
    fn build_router(config: &ServerConfig, state: AppState, limiter: Arc<RateLimiter>) -> Router {
        let rate_limited = middleware::from_fn_with_state(limiter, rate_limit_middleware);

        Router::new()
            .route(
                "/api/book",
                post(book_handler)
                    .route_layer(rate_limited)
                    .fallback(not_found),
            )
            .route("/health", get(health_handler).fallback(not_found))
            .fallback(not_found)
            .with_state(state)
            .layer(cors_layer(&config.listener.cors_origin))
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The rate limiter guarding the booking route.
    pub fn limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.limiter)
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mail_configured = self.config.mail.is_ok(),
            "HTTP server starting"
        );

        let sweeper = self.limiter.spawn_sweeper(shutdown.resubscribe());

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        if let Err(e) = sweeper.await {
            tracing::warn!(error = %e, "Rate-limit sweeper ended abnormally");
        }
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn wait_for_shutdown(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received, draining connections");
}
