//! Booking requests: the payload model and its validation.
//!
//! # Data Flow
//! ```text
//! JSON body (serde_json::Value)
//!     → validation.rs (all fields checked, errors collected)
//!     → BookingRequest (validated, consumed once by the mail composer)
//! ```

pub mod model;
pub mod validation;

pub use model::{BookingRequest, FieldErrors};
pub use validation::{is_email, validate};
