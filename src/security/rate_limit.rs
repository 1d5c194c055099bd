//! Per-client rate limiting for the booking endpoint.
//!
//! Each client address owns a counting window that opens with its first
//! request. Every request counts, admitted or not; requests past
//! `max_requests` inside the window are rejected with 429 before the body is
//! validated.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{connect_info::MockConnectInfo, ConnectInfo, State},
    http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::RateLimitConfig;
use crate::http::response;

const UNKNOWN_CLIENT: &str = "unknown";

static RATELIMIT_POLICY: HeaderName = HeaderName::from_static("ratelimit-policy");
static RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
static RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
static RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");
static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// One client's counting window.
struct Window {
    started: Instant,
    hits: u32,
}

/// Outcome of a single `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Window counter shared by all requests.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            config,
        }
    }

    /// Count one request for `key` and decide whether it may proceed.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Check-and-increment happens under the entry's shard lock, so
    /// concurrent requests from one client never lose a hit.
    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut window = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window { started: now, hits: 0 });

        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.hits = 0;
        }
        window.hits = window.hits.saturating_add(1);

        let limit = self.config.max_requests;
        RateLimitDecision {
            allowed: window.hits <= limit,
            limit,
            remaining: limit.saturating_sub(window.hits),
            reset_after: self
                .config
                .window
                .saturating_sub(now.duration_since(window.started)),
        }
    }

    /// Drop windows that have run out. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.config.window);
        before.saturating_sub(self.windows.len())
    }

    /// Number of clients currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Periodically purge expired windows until shutdown fires.
    pub fn spawn_sweeper(self: &Arc<Self>, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.config.window);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = limiter.purge_expired();
                        if removed > 0 {
                            tracing::debug!(removed, remaining = limiter.tracked_clients(), "Purged expired rate-limit windows");
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }
        })
    }

    /// Attach the configured rate-limit headers to a response.
    pub fn apply_headers(&self, decision: &RateLimitDecision, headers: &mut HeaderMap) {
        let reset_secs = ceil_secs(decision.reset_after);

        if self.config.standard_headers {
            let policy = format!("{};w={}", decision.limit, self.config.window.as_secs());
            if let Ok(value) = HeaderValue::from_str(&policy) {
                headers.insert(RATELIMIT_POLICY.clone(), value);
            }
            headers.insert(RATELIMIT_LIMIT.clone(), HeaderValue::from(decision.limit));
            headers.insert(RATELIMIT_REMAINING.clone(), HeaderValue::from(decision.remaining));
            headers.insert(RATELIMIT_RESET.clone(), HeaderValue::from(reset_secs));
        }

        if self.config.legacy_headers {
            let reset_epoch = chrono::Utc::now().timestamp().saturating_add(reset_secs as i64);
            headers.insert(X_RATELIMIT_LIMIT.clone(), HeaderValue::from(decision.limit));
            headers.insert(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(decision.remaining));
            headers.insert(X_RATELIMIT_RESET.clone(), HeaderValue::from(reset_epoch));
        }

        if !decision.allowed {
            headers.insert(axum::http::header::RETRY_AFTER, HeaderValue::from(reset_secs));
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// Client key: the peer IP of the connection.
fn client_key(request: &Request<Body>) -> String {
    let extensions = request.extensions();
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .or_else(|| {
            extensions
                .get::<MockConnectInfo<SocketAddr>>()
                .map(|MockConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Middleware function for per-client rate limiting.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request);
    let decision = limiter.check(&key);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, limit = decision.limit, "Rate limit exceeded");
        response::failure(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please try again later.",
        )
    };

    limiter.apply_headers(&decision, response.headers_mut());
    response
}
