//! History turns returned by `GET /history`.
//!
//! The backend serves rows straight out of its log table, so field types are
//! not guaranteed: `ts` may be a string or a number and any column may be
//! `null`. Every field is therefore decoded leniently into text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder shown for a field the backend left empty.
const MISSING_FIELD: &str = "-";

/// One historical exchange, read-only on the client.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTurn {
    /// When the exchange was logged.
    #[serde(default, deserialize_with = "lenient_text")]
    pub ts: Option<String>,
    /// Conversation state the backend was in (e.g. `CHAT`, `BRIEF`).
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    /// What the user sent.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    /// What the backend answered.
    #[serde(default, deserialize_with = "lenient_text")]
    pub reply: Option<String>,
    /// Slot snapshot the backend stored alongside the turn, as raw JSON text.
    #[serde(
        default,
        rename = "slots_json",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub slots: Option<String>,
}

impl ChatTurn {
    /// Render the turn as bubble text:
    ///
    /// ```text
    /// [ts] state
    /// Q: message
    /// A: reply
    /// ```
    pub fn display_text(&self) -> String {
        format!(
            "[{}] {}\nQ: {}\nA: {}",
            field(self.ts.as_deref()),
            field(self.state.as_deref()),
            field(self.message.as_deref()),
            field(self.reply.as_deref()),
        )
    }
}

fn field(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING_FIELD)
}

/// Text form of a JSON scalar: strings verbatim, `null` as absent, anything
/// else in its compact JSON form.
pub fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(json_text))
}
