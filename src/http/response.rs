//! JSON response envelopes.
//!
//! Every response body carries `ok`. Successes may add fields, failures carry
//! either a single `error` message or an `errors` map keyed by field.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::booking::FieldErrors;

#[derive(Debug, Serialize)]
struct Success {
    ok: bool,
}

#[derive(Debug, Serialize)]
struct Failure<'a> {
    ok: bool,
    error: &'a str,
}

#[derive(Debug, Serialize)]
struct FieldFailure<'a> {
    ok: bool,
    errors: &'a FieldErrors,
}

/// `200 {ok:true}`
pub fn ok() -> Response {
    (StatusCode::OK, Json(Success { ok: true })).into_response()
}

/// `{ok:false, error}` with the given status.
pub fn failure(status: StatusCode, error: &str) -> Response {
    (status, Json(Failure { ok: false, error })).into_response()
}

/// `400 {ok:false, errors:{field: message}}`
pub fn field_errors(errors: &FieldErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(FieldFailure { ok: false, errors }),
    )
        .into_response()
}
