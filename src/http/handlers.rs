//! Route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::booking;
use crate::error::BookingError;
use crate::http::response;
use crate::mail::Dispatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when mail delivery is not configured.
    pub dispatcher: Option<Arc<Dispatcher>>,
}

#[derive(Serialize)]
struct Health {
    ok: bool,
    time: String,
}

/// `POST /api/book`
///
/// Validation runs before the configuration check, so a bad payload is a
/// 400 even on a server without mail settings.
pub async fn book_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, BookingError> {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Null,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!(request_id = %request_id, "Booking body too large");
            return Err(BookingError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!(request_id = %request_id, reason = %rejection.body_text(), "Malformed booking body");
            return Err(BookingError::MalformedBody);
        }
    };

    let booking = booking::validate(&body).map_err(|errors| {
        tracing::debug!(request_id = %request_id, fields = ?errors.keys().collect::<Vec<_>>(), "Booking rejected");
        BookingError::Validation(errors)
    })?;

    let Some(dispatcher) = state.dispatcher.as_deref() else {
        tracing::error!(request_id = %request_id, "Booking received but mail delivery is not configured");
        return Err(BookingError::NotConfigured);
    };

    if let Err(e) = dispatcher.dispatch(&booking).await {
        tracing::error!(request_id = %request_id, reason = %e, "Email send failed");
        return Err(e.into());
    }

    tracing::info!(request_id = %request_id, date = %booking.date, time = %booking.time, "Booking relayed");
    Ok(response::ok())
}

/// `GET /health`
pub async fn health_handler() -> Json<impl Serialize> {
    Json(Health {
        ok: true,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Fallback for every unknown path or method.
pub async fn not_found() -> impl IntoResponse {
    response::failure(StatusCode::NOT_FOUND, "Not found")
}
