//! Response parsing, classification and rendering.
//!
//! Every backend body goes through the same three steps:
//!
//! 1. [`parse_body`] reads it as text and parses it as JSON. A body that is
//!    not JSON is wrapped as `{"error": <text>}`.
//! 2. [`Response::classify`] decides, once, what the payload means for the
//!    operation that requested it.
//! 3. [`render_bubbles`] turns the header (if any) and the classified
//!    response into bot bubbles with a total match.

use serde_json::{Map, Value};

use crate::bubble::DisplayBubble;
use crate::operation::OperationKind;
use crate::turn::{json_text, ChatTurn};

/// Shown when a chat response carries no usable `reply`.
pub const NO_REPLY_PLACEHOLDER: &str = "(no reply)";

/// Prefix that sets error bubbles apart from replies.
pub const ERROR_PREFIX: &str = "Error: ";

/// Key under which unparseable bodies and transport failures are wrapped.
pub const ERROR_KEY: &str = "error";

/// Classified backend response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Human-readable reply text.
    Reply(String),
    /// An error reported by the backend, the transport, or the parser.
    ErrorMsg(String),
    /// Turns returned by `/history`.
    HistoryList(Vec<ChatTurn>),
    /// Any other payload, rendered pretty-printed.
    RawPayload(Value),
}

/// Parse a body that has already been read as text.
///
/// Never fails: text that is not valid JSON comes back as
/// `{"error": "<text>"}`.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| error_payload(text))
}

/// Wrap a message under the [`ERROR_KEY`].
pub fn error_payload(message: impl Into<String>) -> Value {
    let mut map = Map::new();
    map.insert(ERROR_KEY.to_string(), Value::String(message.into()));
    Value::Object(map)
}

/// Pretty-print a payload with two-space indentation.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Text of a field when it is "truthy": missing, `null`, `false`, `0` and
/// `""` all count as absent.
fn truthy_field(payload: &Value, key: &str) -> Option<String> {
    let value = payload.get(key)?;
    let is_falsy = match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    if is_falsy {
        None
    } else {
        json_text(value)
    }
}

impl Response {
    /// Decide what a parsed payload means for `kind`.
    ///
    /// | Kind | Rule |
    /// |------|------|
    /// | Chat | `error` → `ErrorMsg`, else `reply` or the placeholder → `Reply` |
    /// | History | array of turns → `HistoryList`, else `RawPayload` |
    /// | Radar | `reply` → `Reply`, else `RawPayload` |
    /// | Pulse, Alerts | always `RawPayload` |
    pub fn classify(kind: OperationKind, payload: Value) -> Self {
        match kind {
            OperationKind::Chat => {
                if let Some(error) = truthy_field(&payload, ERROR_KEY) {
                    Self::ErrorMsg(error)
                } else {
                    Self::Reply(
                        truthy_field(&payload, "reply")
                            .unwrap_or_else(|| NO_REPLY_PLACEHOLDER.to_string()),
                    )
                }
            }
            OperationKind::History => {
                if payload.is_array() {
                    match serde_json::from_value::<Vec<ChatTurn>>(payload.clone()) {
                        Ok(turns) => Self::HistoryList(turns),
                        Err(_) => Self::RawPayload(payload),
                    }
                } else {
                    Self::RawPayload(payload)
                }
            }
            OperationKind::Radar => match truthy_field(&payload, "reply") {
                Some(reply) => Self::Reply(reply),
                None => Self::RawPayload(payload),
            },
            OperationKind::Pulse | OperationKind::Alerts => Self::RawPayload(payload),
        }
    }

    /// Bot bubbles for this response, without any header.
    pub fn into_bubbles(self) -> Vec<DisplayBubble> {
        match self {
            Self::Reply(text) => vec![DisplayBubble::bot(text)],
            Self::ErrorMsg(message) => vec![DisplayBubble::bot(format!("{ERROR_PREFIX}{message}"))],
            Self::HistoryList(turns) => turns
                .iter()
                .map(|turn| DisplayBubble::bot(turn.display_text()))
                .collect(),
            Self::RawPayload(value) => vec![DisplayBubble::bot(pretty(&value))],
        }
    }
}

/// All bubbles an operation of `kind` appends once `response` is known:
/// the header (if the kind has one) followed by the response bubbles.
pub fn render_bubbles(kind: OperationKind, response: Response) -> Vec<DisplayBubble> {
    let mut bubbles: Vec<DisplayBubble> = kind.header().map(DisplayBubble::bot).into_iter().collect();
    bubbles.extend(response.into_bubbles());
    bubbles
}

/// Shortcut: parse, classify and render a raw body in one go.
pub fn render_body(kind: OperationKind, body: &str) -> Vec<DisplayBubble> {
    render_bubbles(kind, Response::classify(kind, parse_body(body)))
}
