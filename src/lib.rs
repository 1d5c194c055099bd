//! Booking relay: accepts booking requests over HTTP and forwards them by email.

pub mod booking;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod mail;
pub mod observability;
pub mod security;

pub use config::ServerConfig;
pub use error::BookingError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
