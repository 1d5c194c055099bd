//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Init logging → Load config → Build server → Bind listener
//!
//! Shutdown:
//!     signals.rs (SIGINT/SIGTERM) → shutdown.rs broadcast
//!     → server stops accepting, drains in-flight requests
//!     → rate-limit sweeper exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::trigger_on_signal;
