//! # Chatdesk SDK
//!
//! Client-side plumbing for the Chatdesk agent backend.
//!
//! The SDK provides:
//!
//! * [`Bridge`]: owns the transcript and identifier field and turns user
//!   actions into requests and rendered bubbles.
//! * [`Transport`] / [`HttpTransport`]: the network seam and its `reqwest`
//!   implementation.
//! * [`ClientConfig`]: environment-driven settings.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! Model types from [`chatdesk_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chatdesk_sdk::{Bridge, ClientConfig, HttpTransport};
//!
//! # async fn run() -> Result<(), chatdesk_sdk::SdkError> {
//! let config = ClientConfig::from_env();
//! let mut bridge = Bridge::new(HttpTransport::new(&config.base_url)?, &config);
//! bridge.fetch_history().await;
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod transcript;
pub mod transport;

pub use bridge::{Bridge, CompletedCall, PendingCall, GREETING};
pub use config::ClientConfig;
pub use error::SdkError;
pub use transcript::Transcript;
pub use transport::{HttpTransport, Transport};

// Re-export model types for ergonomic usage.
pub use chatdesk_models::{
    DisplayBubble, Operation, OperationKind, Response, Routes, Sender, UserId,
};
