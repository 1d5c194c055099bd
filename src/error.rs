//! Request-level errors and their JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::booking::FieldErrors;
use crate::http::response;
use crate::mail::DispatchError;

/// Everything that can stop a booking from being relayed.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking payload failed validation")]
    Validation(FieldErrors),

    #[error("request body is not valid JSON")]
    MalformedBody,

    #[error("request body exceeds the size limit")]
    PayloadTooLarge,

    #[error("mail delivery is not configured")]
    NotConfigured,

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl BookingError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookingError::Validation(_) | BookingError::MalformedBody => StatusCode::BAD_REQUEST,
            BookingError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            BookingError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            BookingError::Validation(errors) => response::field_errors(&errors),
            BookingError::MalformedBody => response::failure(status, "Malformed JSON body"),
            BookingError::PayloadTooLarge => response::failure(status, "Payload too large"),
            BookingError::NotConfigured => {
                response::failure(status, "Email not configured on server")
            }
            // The reason stays in the server log.
            BookingError::Delivery(_) => response::failure(status, "Failed to send email"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_taxonomy() {
        assert_eq!(
            BookingError::Validation(FieldErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(BookingError::MalformedBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(BookingError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(BookingError::NotConfigured.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            BookingError::Delivery(DispatchError::Transport("535 auth failed".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
