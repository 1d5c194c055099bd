//! Booking request types.

use std::collections::BTreeMap;

/// A booking that passed validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

impl BookingRequest {
    /// Company name, or the placeholder used in subject lines.
    pub fn company_or(&self, placeholder: &'static str) -> &str {
        if self.company.is_empty() {
            placeholder
        } else {
            &self.company
        }
    }

    /// Notes, or the given placeholder when none were supplied.
    pub fn notes_or(&self, placeholder: &'static str) -> &str {
        if self.notes.is_empty() {
            placeholder
        } else {
            &self.notes
        }
    }
}

/// Field name → human-readable message, ordered by field name.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;
