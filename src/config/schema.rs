//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! Every section has a `Default` so tests can build a config field by field.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::config::loader::MAIL_VARIABLES;

/// Implicit-TLS SMTP port. Any other port negotiates STARTTLS.
pub const SMTPS_PORT: u16 = 465;

/// Root configuration for the booking relay.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listener configuration (port, CORS, body limit).
    pub listener: ListenerConfig,

    /// Mail delivery settings, or why they could not be assembled.
    pub mail: Result<MailConfig, MailUnavailable>,

    /// Rate limiting applied to the booking endpoint.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            mail: Err(MailUnavailable::Missing(MAIL_VARIABLES.to_vec())),
            rate_limit: RateLimitConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// TCP port bound on all interfaces.
    pub port: u16,

    /// Allowed CORS origin. `*` reflects whatever origin the browser sends.
    pub cors_origin: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            cors_origin: "*".to_string(),
            max_body_bytes: 256 * 1024,
        }
    }
}

/// Everything needed to deliver a booking email.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp: SmtpConfig,
    pub contact: ContactConfig,
}

/// Why mail delivery is switched off. Names variables, never their values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailUnavailable {
    #[error("variables not set: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("SMTP_PORT is not a port number")]
    InvalidSmtpPort,
}

/// SMTP relay connection settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl SmtpConfig {
    /// Port 465 speaks TLS from the first byte.
    pub fn implicit_tls(&self) -> bool {
        self.port == SMTPS_PORT
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fixed sender and recipient of booking emails.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Sender address, e.g. `"Bookings <noreply@example.com>"`.
    pub from: String,

    /// Where bookings are delivered.
    pub to: String,
}

/// Rate limiting configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Length of one counting window.
    pub window: Duration,

    /// Requests admitted per client within one window.
    pub max_requests: u32,

    /// Emit `RateLimit-*` headers.
    pub standard_headers: bool,

    /// Emit `X-RateLimit-*` headers.
    pub legacy_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 20,
            standard_headers: true,
            legacy_headers: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else, including unset, is pretty.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
}
