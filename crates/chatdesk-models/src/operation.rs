//! User-triggered operations.
//!
//! Every control in the client maps to exactly one [`Operation`]. The
//! operation decides which endpoint is called, how the response body is
//! classified, and whether a header bubble precedes the rendered result.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Message routed through `/chat` to ask the backend to reset the session.
pub const RESET_SENTINEL: &str = "/reset";

/// The five request shapes the client can issue.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    /// `POST /chat`.
    Chat,
    /// `GET /history`.
    History,
    /// `POST /radar`.
    Radar,
    /// `GET /pulse`.
    Pulse,
    /// `GET /alerts`.
    Alerts,
}

impl OperationKind {
    /// Header bubble rendered before the result, if the operation has one.
    ///
    /// Chat replies are shown bare; every report-style call is announced.
    pub fn header(self) -> Option<&'static str> {
        match self {
            Self::Chat => None,
            Self::History => Some("— HISTORY —"),
            Self::Radar => Some("— RADAR —"),
            Self::Pulse => Some("— PULSE —"),
            Self::Alerts => Some("— ALERTS —"),
        }
    }
}

/// A concrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Send a chat message (the literal text the user entered).
    Chat(String),
    /// Fetch recent turns.
    History,
    /// Ask for a radar report.
    Radar,
    /// Fetch the pulse feed.
    Pulse,
    /// Fetch the alerts feed.
    Alerts,
}

impl Operation {
    /// The reset action: a chat message carrying [`RESET_SENTINEL`].
    pub fn reset() -> Self {
        Self::Chat(RESET_SENTINEL.to_string())
    }

    /// Which endpoint family this operation belongs to.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Chat(_) => OperationKind::Chat,
            Self::History => OperationKind::History,
            Self::Radar => OperationKind::Radar,
            Self::Pulse => OperationKind::Pulse,
            Self::Alerts => OperationKind::Alerts,
        }
    }
}
