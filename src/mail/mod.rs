//! Mail subsystem.
//!
//! # Data Flow
//! ```text
//! BookingRequest
//!     → compose.rs (subject, text, html)
//!     → dispatch.rs (lettre Message, reply-to = requester)
//!     → MailTransport (SMTP relay in production)
//! ```

pub mod compose;
pub mod dispatch;

pub use compose::{compose, ComposedMail};
pub use dispatch::{DispatchError, Dispatcher, MailTransport, SmtpRelay};
