//! Transcript bubbles.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who a bubble is attributed to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    /// Text the local user typed.
    Me,
    /// Anything produced from a backend response.
    Bot,
}

/// One rendered message unit in the transcript.
///
/// Bubbles carry no identity: two bubbles with the same text and sender are
/// still two distinct entries, and their position in the transcript is the
/// only ordering they have.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DisplayBubble {
    /// Text shown inside the bubble, possibly spanning several lines.
    pub text: String,
    /// Author of the bubble.
    pub sender: Sender,
}

impl DisplayBubble {
    /// A bubble attributed to the local user.
    pub fn me(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Me,
        }
    }

    /// A bubble attributed to the backend.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }

    /// `true` if the local user authored this bubble.
    pub fn is_mine(&self) -> bool {
        self.sender == Sender::Me
    }
}
