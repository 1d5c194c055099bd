//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (hardening headers on the way out)
//!     → cors.rs (origin policy, preflight)
//!     → rate_limit.rs (per-client window, booking route only)
//!     → Pass to handler
//! ```

pub mod cors;
pub mod headers;
pub mod rate_limit;

pub use cors::cors_layer;
pub use headers::security_headers_middleware;
pub use rate_limit::{rate_limit_middleware, RateLimitDecision, RateLimiter};
