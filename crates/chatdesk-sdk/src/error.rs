//! SDK error types.
//!
//! [`SdkError`] is returned by every fallible SDK call. Inside the
//! [`Bridge`](crate::Bridge) it never reaches the caller: a failed call is
//! rendered into the transcript like any other response.

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. bad base URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failure (connection refused, reset, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error while encoding a request body.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
