//! Render/transport bridge.
//!
//! [`Bridge`] owns the transcript and the identifier field and maps each
//! user action to one network call and its rendered bubbles.
//!
//! An operation runs in three steps so that the caller decides where the
//! network round trip happens:
//!
//! 1. [`Bridge::begin`] resolves the user id, appends the outbound bubble
//!    (for chat) and returns a [`PendingCall`]. Nothing is sent yet.
//! 2. [`PendingCall::execute`] performs the request on any clone of the
//!    transport and classifies the body into a [`CompletedCall`]. It never
//!    touches the transcript, so it can run on a spawned task.
//! 3. [`Bridge::complete`] appends the header and response bubbles.
//!
//! Calls are not serialized: two pending calls may be in flight at once and
//! each is completed in whatever order its response arrives.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use chatdesk_sdk::{Bridge, ClientConfig, HttpTransport};
//!
//! # async fn run() -> Result<(), chatdesk_sdk::SdkError> {
//! let config = ClientConfig::from_env();
//! let mut bridge = Bridge::new(HttpTransport::new(&config.base_url)?, &config);
//! bridge.set_user_field("alice");
//! bridge.send_chat("hello").await;
//! for bubble in bridge.transcript().bubbles() {
//!     println!("{}> {}", bubble.sender, bubble.text);
//! }
//! # Ok(())
//! # }
//! ```

use chatdesk_models::{
    error_payload, parse_body, render_bubbles, ChatRequest, DisplayBubble, Operation,
    OperationKind, RadarRequest, Response, Routes, UserId,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::SdkError;
use crate::transcript::Transcript;
use crate::transport::Transport;

/// First bubble of a fresh session.
pub const GREETING: &str = "Ready. Type a message.";

/// JSON bodies the client posts.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum PostBody {
    Chat(ChatRequest),
    Radar(RadarRequest),
}

/// The request half of a started operation.
#[derive(Debug, Clone, PartialEq)]
enum Request {
    Post {
        path: &'static str,
        body: PostBody,
    },
    Get {
        path: &'static str,
        query: Vec<(&'static str, String)>,
    },
}

/// An operation whose outbound bubble is in the transcript and whose
/// network call has not been made yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    kind: OperationKind,
    user_id: UserId,
    request: Request,
}

impl PendingCall {
    /// Which operation this call belongs to.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The identifier captured when the call was started.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Send the request and classify the body.
    ///
    /// Infallible by construction: a transport failure is wrapped as
    /// `{"error": "<message>"}` and classified like any other body.
    pub async fn execute<T: Transport>(self, transport: &T) -> CompletedCall {
        let result = match &self.request {
            Request::Post { path, body } => match serde_json::to_value(body) {
                Ok(body) => transport.post_json(path, &body).await,
                Err(e) => Err(SdkError::from(e)),
            },
            Request::Get { path, query } => transport.get(path, query).await,
        };

        let payload = match result {
            Ok(text) => parse_body(&text),
            Err(e) => {
                warn!(kind = %self.kind, user_id = %self.user_id, error = %e, "request failed");
                error_payload(e.to_string())
            }
        };

        CompletedCall {
            kind: self.kind,
            response: Response::classify(self.kind, payload),
        }
    }
}

/// A finished call, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCall {
    /// Which operation produced the response.
    pub kind: OperationKind,
    /// The classified response.
    pub response: Response,
}

/// Owns the transcript and the identifier field; issues requests through `T`.
#[derive(Debug, Clone)]
pub struct Bridge<T> {
    transport: T,
    transcript: Transcript,
    user_field: String,
    fallback_user_id: String,
    history_limit: u32,
    feed_limit: u32,
}

impl<T: Transport> Bridge<T> {
    /// Create a bridge with an empty transcript and an empty identifier field.
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            transcript: Transcript::new(),
            user_field: String::new(),
            fallback_user_id: config.fallback_user_id.clone(),
            history_limit: config.history_limit,
            feed_limit: config.feed_limit,
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// The transport new calls are issued on.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read-only view of the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Raw contents of the identifier field.
    pub fn user_field(&self) -> &str {
        &self.user_field
    }

    /// Replace the contents of the identifier field.
    pub fn set_user_field(&mut self, raw: impl Into<String>) {
        self.user_field = raw.into();
    }

    /// Mutable access to the identifier field, for in-place editing.
    pub fn user_field_mut(&mut self) -> &mut String {
        &mut self.user_field
    }

    /// Identifier the next call will use, resolved from the field right now.
    pub fn user_id(&self) -> UserId {
        UserId::resolve(&self.user_field, &self.fallback_user_id)
    }

    /// Append the greeting bubble.
    pub fn greet(&mut self) {
        self.transcript.push(DisplayBubble::bot(GREETING));
    }

    // ------------------------------------------------------------------
    // Split lifecycle
    // ------------------------------------------------------------------

    /// Start an operation.
    ///
    /// Returns `None` (and changes nothing) for a chat message that is empty
    /// after trimming. Otherwise a chat message is appended as a "me" bubble
    /// with its literal text before the call is handed back.
    pub fn begin(&mut self, operation: Operation) -> Option<PendingCall> {
        let kind = operation.kind();
        let user_id = self.user_id();

        let request = match operation {
            Operation::Chat(message) => {
                if message.trim().is_empty() {
                    return None;
                }
                self.transcript.push(DisplayBubble::me(message.clone()));
                Request::Post {
                    path: Routes::CHAT,
                    body: PostBody::Chat(ChatRequest {
                        user_id: user_id.clone(),
                        message,
                    }),
                }
            }
            Operation::History => Request::Get {
                path: Routes::HISTORY,
                query: feed_query(&user_id, self.history_limit),
            },
            Operation::Radar => Request::Post {
                path: Routes::RADAR,
                body: PostBody::Radar(RadarRequest {
                    user_id: user_id.clone(),
                }),
            },
            Operation::Pulse => Request::Get {
                path: Routes::PULSE,
                query: feed_query(&user_id, self.feed_limit),
            },
            Operation::Alerts => Request::Get {
                path: Routes::ALERTS,
                query: feed_query(&user_id, self.feed_limit),
            },
        };

        debug!(kind = %kind, user_id = %user_id, "operation started");
        Some(PendingCall {
            kind,
            user_id,
            request,
        })
    }

    /// Render a finished call into the transcript.
    ///
    /// Returns the number of bubbles appended.
    pub fn complete(&mut self, call: CompletedCall) -> usize {
        let bubbles = render_bubbles(call.kind, call.response);
        let appended = bubbles.len();
        self.transcript.extend(bubbles);
        appended
    }

    /// Begin, execute and complete one operation in sequence.
    ///
    /// Returns the classified response, or `None` if the operation was
    /// rejected by [`begin`](Self::begin).
    pub async fn run(&mut self, operation: Operation) -> Option<Response> {
        let pending = self.begin(operation)?;
        let completed = pending.execute(&self.transport).await;
        let response = completed.response.clone();
        self.complete(completed);
        Some(response)
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Send a chat message. Blank input is ignored.
    pub async fn send_chat(&mut self, text: &str) -> Option<Response> {
        self.run(Operation::Chat(text.to_string())).await
    }

    /// Ask the backend to reset the conversation.
    pub async fn reset_conversation(&mut self) -> Option<Response> {
        self.run(Operation::reset()).await
    }

    /// Fetch recent turns.
    pub async fn fetch_history(&mut self) -> Option<Response> {
        self.run(Operation::History).await
    }

    /// Ask for a radar report.
    pub async fn fetch_radar(&mut self) -> Option<Response> {
        self.run(Operation::Radar).await
    }

    /// Fetch the pulse feed.
    pub async fn fetch_pulse(&mut self) -> Option<Response> {
        self.run(Operation::Pulse).await
    }

    /// Fetch the alerts feed.
    pub async fn fetch_alerts(&mut self) -> Option<Response> {
        self.run(Operation::Alerts).await
    }
}

fn feed_query(user_id: &UserId, limit: u32) -> Vec<(&'static str, String)> {
    vec![("user_id", user_id.to_string()), ("limit", limit.to_string())]
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use chatdesk_models::{Sender, NO_REPLY_PLACEHOLDER};
    use serde_json::{json, Value};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Post(String, Value),
        Get(String, Vec<(String, String)>),
    }

    /// In-memory transport replaying scripted bodies in order.
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl ScriptedTransport {
        fn replying(replies: &[Result<&str, &str>]) -> Self {
            let t = Self::default();
            t.replies.lock().unwrap().extend(
                replies
                    .iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string)),
            );
            t
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next_reply(&self) -> Result<String, SdkError> {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left");
            reply.map_err(SdkError::Config)
        }
    }

    impl Transport for ScriptedTransport {
        async fn post_json(&self, path: &str, body: &Value) -> Result<String, SdkError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Post(path.to_string(), body.clone()));
            self.next_reply()
        }

        async fn get(
            &self,
            path: &str,
            query: &[(&'static str, String)],
        ) -> Result<String, SdkError> {
            let query = query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect();
            self.calls
                .lock()
                .unwrap()
                .push(Call::Get(path.to_string(), query));
            self.next_reply()
        }
    }

    fn bridge(replies: &[Result<&str, &str>]) -> Bridge<ScriptedTransport> {
        Bridge::new(ScriptedTransport::replying(replies), &ClientConfig::default())
    }

    fn texts(bridge: &Bridge<ScriptedTransport>) -> Vec<(Sender, String)> {
        bridge
            .transcript()
            .bubbles()
            .iter()
            .map(|b| (b.sender, b.text.clone()))
            .collect()
    }

    // -- chat ---------------------------------------------------------------

    #[tokio::test]
    async fn chat_reply_appends_me_then_bot() {
        let mut b = bridge(&[Ok(r#"{"reply":"hi"}"#)]);
        b.set_user_field("alice");

        let response = b.send_chat("hello").await;

        assert_eq!(response, Some(Response::Reply("hi".into())));
        assert_eq!(
            texts(&b),
            vec![(Sender::Me, "hello".into()), (Sender::Bot, "hi".into())]
        );
        assert_eq!(
            b.transport().calls(),
            vec![Call::Post(
                "/chat".into(),
                json!({ "user_id": "alice", "message": "hello" })
            )]
        );
    }

    #[tokio::test]
    async fn chat_keeps_literal_text() {
        let mut b = bridge(&[Ok(r#"{"reply":"ok"}"#)]);
        b.send_chat("  spaced out  ").await;
        assert_eq!(b.transcript().bubbles()[0], DisplayBubble::me("  spaced out  "));
        match &b.transport().calls()[0] {
            Call::Post(_, body) => assert_eq!(body["message"], "  spaced out  "),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_chat_is_ignored() {
        let mut b = bridge(&[]);
        assert_eq!(b.send_chat("").await, None);
        assert_eq!(b.send_chat(" \t\n ").await, None);
        assert!(b.transcript().is_empty());
        assert!(b.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn chat_error_is_prefixed() {
        let mut b = bridge(&[Ok(r#"{"error":"bad"}"#)]);
        b.send_chat("x").await;
        let last = b.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, "Error: bad");
        assert_eq!(b.transcript().len(), 2);
    }

    #[tokio::test]
    async fn chat_without_reply_uses_placeholder() {
        let mut b = bridge(&[Ok(r#"{"state":"CHAT"}"#)]);
        b.send_chat("x").await;
        assert_eq!(b.transcript().last().unwrap().text, NO_REPLY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn non_json_body_is_rendered_not_raised() {
        let mut b = bridge(&[Ok("oops")]);
        let response = b.send_chat("x").await;
        assert_eq!(response, Some(Response::ErrorMsg("oops".into())));
        assert!(b.transcript().last().unwrap().text.contains("oops"));
    }

    #[tokio::test]
    async fn transport_failure_becomes_bot_bubble() {
        let mut b = bridge(&[Err("connection refused"), Ok(r#"{"reply":"back"}"#)]);
        b.send_chat("first").await;
        let last = b.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert!(last.text.starts_with("Error: "));
        assert!(last.text.contains("connection refused"));

        // Still usable afterwards.
        b.send_chat("second").await;
        assert_eq!(b.transcript().last().unwrap().text, "back");
        assert_eq!(b.transcript().len(), 4);
    }

    #[tokio::test]
    async fn reset_sends_sentinel_through_chat() {
        let mut b = bridge(&[Ok(r#"{"reply":"reset done"}"#)]);
        b.reset_conversation().await;
        assert_eq!(
            texts(&b),
            vec![(Sender::Me, "/reset".into()), (Sender::Bot, "reset done".into())]
        );
        assert!(matches!(&b.transport().calls()[0], Call::Post(p, _) if p == "/chat"));
    }

    // -- identifier -----------------------------------------------------------

    #[tokio::test]
    async fn identifier_is_trimmed_and_read_per_call() {
        let mut b = bridge(&[Ok("{}"), Ok("{}"), Ok("{}")]);
        b.set_user_field("  bob ");
        b.fetch_pulse().await;
        b.set_user_field("   ");
        b.fetch_alerts().await;
        b.user_field_mut().push_str("carol");
        b.fetch_radar().await;

        let calls = b.transport().calls();
        assert_eq!(
            calls[0],
            Call::Get(
                "/pulse".into(),
                vec![("user_id".into(), "bob".into()), ("limit".into(), "50".into())]
            )
        );
        assert_eq!(
            calls[1],
            Call::Get(
                "/alerts".into(),
                vec![("user_id".into(), "test".into()), ("limit".into(), "50".into())]
            )
        );
        assert_eq!(calls[2], Call::Post("/radar".into(), json!({ "user_id": "carol" })));
    }

    #[test]
    fn configured_fallback_is_used() {
        let config = ClientConfig {
            fallback_user_id: "guest".into(),
            ..ClientConfig::default()
        };
        let b = Bridge::new(ScriptedTransport::default(), &config);
        assert_eq!(b.user_id(), UserId::new("guest"));
    }

    // -- reports --------------------------------------------------------------

    #[tokio::test]
    async fn history_renders_header_then_turns() {
        let mut b = bridge(&[Ok(
            r#"[{"ts":1,"state":"S","message":"Q","reply":"A"},{"ts":"0","state":"CHAT","message":"m","reply":"r"}]"#,
        )]);
        b.fetch_history().await;

        assert_eq!(
            texts(&b),
            vec![
                (Sender::Bot, "— HISTORY —".into()),
                (Sender::Bot, "[1] S\nQ: Q\nA: A".into()),
                (Sender::Bot, "[0] CHAT\nQ: m\nA: r".into()),
            ]
        );
        assert_eq!(
            b.transport().calls(),
            vec![Call::Get(
                "/history".into(),
                vec![("user_id".into(), "test".into()), ("limit".into(), "20".into())]
            )]
        );
    }

    #[tokio::test]
    async fn history_non_array_is_pretty_printed() {
        let mut b = bridge(&[Ok("Internal Server Error")]);
        b.fetch_history().await;
        assert_eq!(
            texts(&b),
            vec![
                (Sender::Bot, "— HISTORY —".into()),
                (Sender::Bot, "{\n  \"error\": \"Internal Server Error\"\n}".into()),
            ]
        );
    }

    #[tokio::test]
    async fn radar_reply_or_payload() {
        let mut b = bridge(&[Ok(r#"{"reply":"3 signals"}"#), Ok(r#"{"user_id":"test"}"#)]);
        b.fetch_radar().await;
        b.fetch_radar().await;
        assert_eq!(
            texts(&b),
            vec![
                (Sender::Bot, "— RADAR —".into()),
                (Sender::Bot, "3 signals".into()),
                (Sender::Bot, "— RADAR —".into()),
                (Sender::Bot, "{\n  \"user_id\": \"test\"\n}".into()),
            ]
        );
    }

    #[tokio::test]
    async fn pulse_and_alerts_pretty_print_everything() {
        let mut b = bridge(&[Ok(r#"{"reply":"x"}"#), Ok("[]")]);
        b.fetch_pulse().await;
        b.fetch_alerts().await;
        assert_eq!(
            texts(&b),
            vec![
                (Sender::Bot, "— PULSE —".into()),
                (Sender::Bot, "{\n  \"reply\": \"x\"\n}".into()),
                (Sender::Bot, "— ALERTS —".into()),
                (Sender::Bot, "[]".into()),
            ]
        );
    }

    // -- ordering -------------------------------------------------------------

    #[tokio::test]
    async fn me_bubble_precedes_the_network_call() {
        let mut b = bridge(&[Ok(r#"{"reply":"pong"}"#)]);
        let pending = b.begin(Operation::Chat("ping".into())).unwrap();

        assert_eq!(b.transcript().bubbles(), &[DisplayBubble::me("ping")]);
        assert!(b.transport().calls().is_empty());

        let done = pending.execute(&b.transport().clone()).await;
        assert_eq!(b.transcript().len(), 1);
        assert_eq!(b.complete(done), 1);
        assert_eq!(b.transcript().last(), Some(&DisplayBubble::bot("pong")));
    }

    #[tokio::test]
    async fn overlapping_calls_render_in_arrival_order() {
        let mut b = bridge(&[Ok(r#"{"reply":"one"}"#), Ok(r#"{"reply":"two"}"#)]);
        let first = b.begin(Operation::Chat("1".into())).unwrap();
        let second = b.begin(Operation::Chat("2".into())).unwrap();

        let transport = b.transport().clone();
        let first_done = first.execute(&transport).await;
        let second_done = second.execute(&transport).await;

        // The second response "arrives" first.
        b.complete(second_done);
        b.complete(first_done);

        assert_eq!(
            texts(&b),
            vec![
                (Sender::Me, "1".into()),
                (Sender::Me, "2".into()),
                (Sender::Bot, "two".into()),
                (Sender::Bot, "one".into()),
            ]
        );
    }

    #[test]
    fn pending_call_captures_identifier_at_begin() {
        let mut b = bridge(&[]);
        b.set_user_field("early");
        let pending = b.begin(Operation::History).unwrap();
        b.set_user_field("late");
        assert_eq!(pending.user_id().as_str(), "early");
        assert_eq!(pending.kind(), OperationKind::History);
    }

    #[test]
    fn greeting_is_a_bot_bubble() {
        let mut b = bridge(&[]);
        b.greet();
        assert_eq!(b.transcript().bubbles(), &[DisplayBubble::bot(GREETING)]);
    }
}
