//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read variables, apply defaults, semantic checks)
//!     → ServerConfig (immutable)
//!     → shared via Arc with the router and mail dispatcher
//! ```
//!
//! Nothing reads the environment after startup.

pub mod loader;
pub mod schema;

pub use loader::{from_env, from_lookup, ConfigError};
pub use schema::{
    ContactConfig, ListenerConfig, LogFormat, MailConfig, MailUnavailable, ObservabilityConfig,
    RateLimitConfig, ServerConfig, SmtpConfig,
};
