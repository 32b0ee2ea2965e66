//! Canonical backend endpoint paths.
//!
//! Every path the client calls is defined here so the SDK, the mock backend
//! and the tests agree on one spelling.
//!
//! # Endpoint layout
//!
//! ```text
//! POST /chat      {user_id, message}       ← chat and the /reset sentinel
//! GET  /history   ?user_id=&limit=20       ← recent turns
//! POST /radar     {user_id}                ← radar report
//! GET  /pulse     ?user_id=&limit=50       ← pulse feed
//! GET  /alerts    ?user_id=&limit=50       ← alerts feed
//! GET  /health                              ← liveness (mock backend only)
//! ```

use crate::operation::OperationKind;

/// Central authority for all backend paths.
///
/// # Examples
///
/// ```
/// use chatdesk_models::{OperationKind, Routes};
///
/// assert_eq!(Routes::for_kind(OperationKind::Chat), "/chat");
/// assert_eq!(Routes::for_kind(OperationKind::Alerts), "/alerts");
/// ```
pub struct Routes;

impl Routes {
    /// `POST` chat messages.
    pub const CHAT: &'static str = "/chat";
    /// `GET` conversation history.
    pub const HISTORY: &'static str = "/history";
    /// `POST` radar requests.
    pub const RADAR: &'static str = "/radar";
    /// `GET` pulse feed.
    pub const PULSE: &'static str = "/pulse";
    /// `GET` alerts feed.
    pub const ALERTS: &'static str = "/alerts";
    /// `GET` liveness probe.
    pub const HEALTH: &'static str = "/health";

    /// Path an operation of `kind` is sent to.
    pub fn for_kind(kind: OperationKind) -> &'static str {
        match kind {
            OperationKind::Chat => Self::CHAT,
            OperationKind::History => Self::HISTORY,
            OperationKind::Radar => Self::RADAR,
            OperationKind::Pulse => Self::PULSE,
            OperationKind::Alerts => Self::ALERTS,
        }
    }

    /// Join a base URL and a path without doubling the slash.
    ///
    /// Given `"http://localhost:8000/"` and `"/chat"` returns
    /// `"http://localhost:8000/chat"`.
    pub fn join(base_url: &str, path: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}
