//! Error types for the mock backend.
//!
//! [`MockError`] implements [`axum::response::IntoResponse`] and always
//! answers with an `{"error": ...}` body, the shape the client renders as an
//! error bubble.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chatdesk_models::error_payload;

/// Errors the mock backend reports to the client.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// `POST /chat` with a blank message.
    #[error("message must not be empty")]
    EmptyMessage,

    /// A request without a usable `user_id`.
    #[error("user_id must not be empty")]
    MissingUser,
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::EmptyMessage | Self::MissingUser => StatusCode::BAD_REQUEST,
        };

        tracing::warn!(%status, error = %self, "request rejected");
        (status, Json(error_payload(self.to_string()))).into_response()
    }
}
