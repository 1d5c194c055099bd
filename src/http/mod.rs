//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → security (headers, CORS, rate limit)
//!     → handlers.rs (validate, dispatch)
//!     → response.rs (JSON envelopes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use handlers::AppState;
pub use server::HttpServer;
