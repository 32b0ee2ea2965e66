//! Mock agent backend.
//!
//! A canned implementation of the five endpoints the Chatdesk client calls,
//! for local development and HTTP-level tests. It has no conversational
//! logic: chat messages are echoed back, turns are kept in memory per user,
//! and the analytics endpoints return fixed payloads.
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `POST /chat` | Echo the message and record the turn; `/reset` is acknowledged and logged like any turn |
//! | `GET /history` | Newest-first turns, `limit` clamped to `1..=200` |
//! | `POST /radar` | Summary of the recorded turns |
//! | `GET /pulse`, `GET /alerts` | Fixed payloads echoing `user_id` and `limit` |
//! | `GET /health` | Liveness probe |

pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chatdesk_models::{
    ChatReply, ChatRequest, ChatTurn, FeedQuery, RadarReply, RadarRequest, Routes, UserId,
    RESET_SENTINEL,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::MockError;

/// Messages treated as a reset request.
const RESET_WORDS: [&str; 2] = [RESET_SENTINEL, "reset"];

/// Reply sent after a reset.
pub const RESET_REPLY: &str = "Conversation reset. Tell me again.";

/// Default `limit` for `/history`.
const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Default `limit` for `/pulse` and `/alerts`.
const DEFAULT_FEED_LIMIT: u32 = 50;

/// Upper bound accepted for any `limit`.
const MAX_LIMIT: u32 = 200;

/// Conversation state kept for every user, oldest turn first.
#[derive(Debug, Default)]
pub struct MockState {
    turns: RwLock<HashMap<UserId, Vec<ChatTurn>>>,
}

impl MockState {
    /// Number of turns recorded for `user_id`.
    pub async fn turn_count(&self, user_id: &UserId) -> usize {
        self.turns.read().await.get(user_id).map_or(0, Vec::len)
    }
}

/// Build the router with fresh, empty state.
pub fn router() -> Router {
    router_with_state(Arc::new(MockState::default()))
}

/// Build the router on top of existing state.
pub fn router_with_state(state: Arc<MockState>) -> Router {
    Router::new()
        .route(Routes::HEALTH, get(health))
        .route(Routes::CHAT, post(chat))
        .route(Routes::HISTORY, get(history))
        .route(Routes::RADAR, post(radar))
        .route(Routes::PULSE, get(pulse))
        .route(Routes::ALERTS, get(alerts))
        .with_state(state)
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn require_user(user_id: &UserId) -> Result<UserId, MockError> {
    let trimmed = user_id.as_str().trim();
    if trimmed.is_empty() {
        Err(MockError::MissingUser)
    } else {
        Ok(UserId::new(trimmed))
    }
}

fn clamp_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`
async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "version": env!("CARGO_PKG_VERSION") }))
}

/// `POST /chat`: echo the message and record the turn.
async fn chat(
    State(state): State<Arc<MockState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, MockError> {
    let user_id = require_user(&req.user_id)?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err(MockError::EmptyMessage);
    }

    let mut turns = state.turns.write().await;
    let log = turns.entry(user_id.clone()).or_default();

    // a reset leaves the turn log intact
    let reply = if RESET_WORDS.contains(&message) {
        info!(user_id = %user_id, "conversation reset");
        RESET_REPLY.to_string()
    } else {
        format!("You said: {message}")
    };

    let state_name = "CHAT".to_string();
    log.push(ChatTurn {
        ts: Some(now()),
        state: Some(state_name.clone()),
        message: Some(message.to_string()),
        reply: Some(reply.clone()),
        slots: None,
    });
    info!(user_id = %user_id, turns = log.len(), "chat turn recorded");

    Ok(Json(ChatReply {
        user_id,
        state: state_name,
        reply,
    }))
}

/// `GET /history`: newest turns first.
async fn history(
    State(state): State<Arc<MockState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<ChatTurn>>, MockError> {
    let user_id = require_user(&query.user_id)?;
    let limit = clamp_limit(query.limit, DEFAULT_HISTORY_LIMIT) as usize;

    let turns = state.turns.read().await;
    let recent: Vec<ChatTurn> = turns
        .get(&user_id)
        .map(|log| log.iter().rev().take(limit).cloned().collect())
        .unwrap_or_default();

    info!(user_id = %user_id, limit, returned = recent.len(), "history served");
    Ok(Json(recent))
}

/// `POST /radar`: summarize what has been said so far.
async fn radar(
    State(state): State<Arc<MockState>>,
    Json(req): Json<RadarRequest>,
) -> Result<Json<RadarReply>, MockError> {
    let user_id = require_user(&req.user_id)?;

    let turns = state.turns.read().await;
    let reply = match turns.get(&user_id).and_then(|log| log.last().map(|t| (log.len(), t))) {
        Some((count, latest)) => format!(
            "Radar for {user_id}: {count} turn(s) recorded, latest message \"{}\".",
            latest.message.as_deref().unwrap_or_default()
        ),
        None => "No conversation recorded yet. Chat first, then ask for a radar.".to_string(),
    };

    info!(user_id = %user_id, "radar served");
    Ok(Json(RadarReply { user_id, reply }))
}

/// `GET /pulse`
async fn pulse(Query(query): Query<FeedQuery>) -> Result<Json<Value>, MockError> {
    let user_id = require_user(&query.user_id)?;
    let limit = clamp_limit(query.limit, DEFAULT_FEED_LIMIT);
    info!(user_id = %user_id, limit, "pulse served");
    Ok(Json(json!({ "user_id": user_id, "limit": limit, "signals": [] })))
}

/// `GET /alerts`
async fn alerts(Query(query): Query<FeedQuery>) -> Result<Json<Value>, MockError> {
    let user_id = require_user(&query.user_id)?;
    let limit = clamp_limit(query.limit, DEFAULT_FEED_LIMIT);
    info!(user_id = %user_id, limit, "alerts served");
    Ok(Json(json!({ "user_id": user_id, "limit": limit, "alerts": [] })))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn server() -> TestServer {
        TestServer::new(router()).unwrap()
    }

    async fn say(server: &TestServer, user: &str, message: &str) -> ChatReply {
        let res = server
            .post(Routes::CHAT)
            .json(&json!({ "user_id": user, "message": message }))
            .await;
        res.assert_status_ok();
        res.json::<ChatReply>()
    }

    #[tokio::test]
    async fn chat_echoes_message() {
        let server = server();
        let reply = say(&server, "u1", "hello").await;
        assert_eq!(reply.user_id, UserId::new("u1"));
        assert_eq!(reply.state, "CHAT");
        assert_eq!(reply.reply, "You said: hello");
    }

    #[tokio::test]
    async fn empty_message_is_rejected_with_error_body() {
        let server = server();
        let res = server
            .post(Routes::CHAT)
            .json(&json!({ "user_id": "u1", "message": "   " }))
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(res.json::<Value>(), json!({ "error": "message must not be empty" }));
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let server = server();
        for msg in ["one", "two", "three"] {
            say(&server, "u1", msg).await;
        }

        let res = server
            .get(Routes::HISTORY)
            .add_query_param("user_id", "u1")
            .add_query_param("limit", 2)
            .await;
        res.assert_status_ok();
        let turns = res.json::<Vec<ChatTurn>>();
        let messages: Vec<_> = turns.iter().map(|t| t.message.as_deref().unwrap()).collect();
        assert_eq!(messages, vec!["three", "two"]);
    }

    #[tokio::test]
    async fn history_is_per_user() {
        let server = server();
        say(&server, "u1", "mine").await;

        let res = server.get(Routes::HISTORY).add_query_param("user_id", "u2").await;
        assert!(res.json::<Vec<ChatTurn>>().is_empty());
    }

    #[tokio::test]
    async fn reset_keeps_turn_log() {
        let state = Arc::new(MockState::default());
        let server = TestServer::new(router_with_state(state.clone())).unwrap();
        say(&server, "u1", "a").await;
        say(&server, "u1", "b").await;

        let reply = say(&server, "u1", RESET_SENTINEL).await;
        assert_eq!(reply.reply, RESET_REPLY);
        assert_eq!(state.turn_count(&UserId::new("u1")).await, 3);

        let res = server.get(Routes::HISTORY).add_query_param("user_id", "u1").await;
        let turns = res.json::<Vec<ChatTurn>>();
        let messages: Vec<_> = turns.iter().map(|t| t.message.as_deref().unwrap()).collect();
        assert_eq!(messages, vec![RESET_SENTINEL, "b", "a"]);
    }

    #[tokio::test]
    async fn radar_without_turns_explains() {
        let server = server();
        let res = server
            .post(Routes::RADAR)
            .json(&json!({ "user_id": "nobody" }))
            .await;
        assert!(res.json::<RadarReply>().reply.starts_with("No conversation"));
    }

    #[tokio::test]
    async fn radar_summarizes_turns() {
        let server = server();
        say(&server, "u1", "sunscreen for Japan").await;
        let res = server.post(Routes::RADAR).json(&json!({ "user_id": "u1" })).await;
        let reply = res.json::<RadarReply>().reply;
        assert!(reply.contains("1 turn(s)"));
        assert!(reply.contains("sunscreen for Japan"));
    }

    #[tokio::test]
    async fn feeds_echo_clamped_limit() {
        let server = server();
        let res = server
            .get(Routes::PULSE)
            .add_query_param("user_id", "u1")
            .add_query_param("limit", 5000)
            .await;
        assert_eq!(res.json::<Value>()["limit"], 200);

        let res = server.get(Routes::ALERTS).add_query_param("user_id", "u1").await;
        let body = res.json::<Value>();
        assert_eq!(body["limit"], 50);
        assert_eq!(body["user_id"], "u1");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let res = server().get(Routes::HEALTH).await;
        assert_eq!(res.json::<Value>()["ok"], true);
    }
}
