//! Observability subsystem.
//!
//! All subsystems log through `tracing` with structured fields. Each HTTP
//! request carries an `x-request-id` that handlers attach to their events,
//! and `tower_http`'s trace layer records one span per request.

pub mod logging;
