//! Booking payload validation.
//!
//! Pure functions: a JSON body in, a `BookingRequest` or the full set of
//! field errors out. Every field is checked; nothing short-circuits.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::booking::model::{BookingRequest, FieldErrors};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Basic `local@domain.tld` shape check on the trimmed input.
pub fn is_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate.trim())
}

/// Validate a parsed request body.
///
/// A body that is not a JSON object is treated as an empty one, so the
/// caller gets the usual per-field errors instead of a parse failure.
pub fn validate(body: &Value) -> Result<BookingRequest, FieldErrors> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);

    let mut errors = FieldErrors::new();

    let name = required_text(fields, "name");
    if name.is_none() {
        errors.insert("name", "Name is required");
    }

    let email = fields
        .get("email")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|e| is_email(e));
    if email.is_none() {
        errors.insert("email", "Valid email is required");
    }

    let date = required_text(fields, "date");
    if date.is_none() {
        errors.insert("date", "Select a date");
    }

    let time = required_text(fields, "time");
    if time.is_none() {
        errors.insert("time", "Select a time");
    }

    match (name, email, date, time) {
        (Some(name), Some(email), Some(date), Some(time)) => {
            Ok(BookingRequest {
                name: name.to_string(),
                email: email.to_string(),
                company: optional_text(fields, "company"),
                date: date.to_string(),
                time: time.to_string(),
                notes: optional_text(fields, "notes"),
            })
        }
        _ => Err(errors),
    }
}

/// A string field whose trimmed value is non-empty.
fn required_text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Free-form field. Missing or null is empty; other scalars use their JSON text.
fn optional_text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Bool(_) | Value::Number(_))) => v.to_string(),
        Some(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "company": "Analytical Engines",
            "date": "2026-11-02",
            "time": "10:30",
            "notes": "Bring the punch cards"
        })
    }

    #[test]
    fn email_shape() {
        assert!(is_email("a@b.com"));
        assert!(is_email("  First.Last+tag@Sub.Example.ORG  "));
        assert!(!is_email("not-an-email"));
        assert!(!is_email(""));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@@b.com"));
        assert!(!is_email("@b.com"));
    }

    #[test]
    fn valid_body_produces_trimmed_request() {
        let mut body = valid_body();
        body["name"] = json!("  Ada Lovelace  ");
        body["email"] = json!(" ada@example.com ");

        let booking = validate(&body).unwrap();
        assert_eq!(booking.name, "Ada Lovelace");
        assert_eq!(booking.email, "ada@example.com");
        assert_eq!(booking.company, "Analytical Engines");
        assert_eq!(booking.notes, "Bring the punch cards");
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let mut body = valid_body();
        let fields = body.as_object_mut().unwrap();
        fields.remove("company");
        fields.insert("notes".into(), Value::Null);

        let booking = validate(&body).unwrap();
        assert_eq!(booking.company, "");
        assert_eq!(booking.notes, "");
    }

    #[test]
    fn date_and_time_accept_any_non_empty_text() {
        let mut body = valid_body();
        body["date"] = json!("next Tuesday-ish");
        body["time"] = json!("whenever suits");
        assert!(validate(&body).is_ok());
    }

    #[test]
    fn every_subset_of_missing_required_fields_is_reported() {
        let required = ["name", "email", "date", "time"];
        for mask in 1u8..16 {
            let mut body = valid_body();
            let fields = body.as_object_mut().unwrap();
            let removed: Vec<&str> = required
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, k)| *k)
                .collect();
            for key in &removed {
                fields.remove(*key);
            }

            let errors = validate(&body).unwrap_err();
            let keys: Vec<&str> = errors.keys().copied().collect();
            let mut expected = removed.clone();
            expected.sort();
            assert_eq!(keys, expected, "mask {mask:04b}");
        }
    }

    #[test]
    fn whitespace_and_wrong_types_fail() {
        let body = json!({
            "name": "   ",
            "email": 42,
            "date": ["2026-11-02"],
            "time": null
        });
        let errors = validate(&body).unwrap_err();
        assert_eq!(errors.get("name"), Some(&"Name is required"));
        assert_eq!(errors.get("email"), Some(&"Valid email is required"));
        assert_eq!(errors.get("date"), Some(&"Select a date"));
        assert_eq!(errors.get("time"), Some(&"Select a time"));
    }

    #[test]
    fn non_object_body_reports_all_required_fields() {
        let errors = validate(&json!(["ada@example.com"])).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn scalar_optional_fields_use_their_text() {
        let mut body = valid_body();
        body["company"] = json!(1984);
        body["notes"] = json!({"nested": true});
        let booking = validate(&body).unwrap();
        assert_eq!(booking.company, "1984");
        assert_eq!(booking.notes, "");
    }
}
