//! Request and reply bodies exchanged with the backend.
//!
//! The client only ever *sends* these request types; replies are parsed
//! loosely through [`crate::Response::classify`]. The reply structs exist so
//! the mock backend and the client agree on one definition of the contract.

use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Conversation owner.
    pub user_id: UserId,
    /// Literal text the user entered.
    pub message: String,
}

/// Body of `POST /radar`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RadarRequest {
    /// Conversation owner.
    pub user_id: UserId,
}

/// Query string of `GET /history`, `GET /pulse` and `GET /alerts`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Conversation owner.
    pub user_id: UserId,
    /// Maximum number of records requested.
    pub limit: Option<u32>,
}

/// Successful reply of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Conversation owner.
    pub user_id: UserId,
    /// Backend state after handling the message.
    pub state: String,
    /// Text to show the user.
    pub reply: String,
}

/// Reply of `POST /radar`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RadarReply {
    /// Conversation owner.
    pub user_id: UserId,
    /// Human-readable report.
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_wire_shape() {
        let req = ChatRequest {
            user_id: UserId::new("u1"),
            message: "hello".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "user_id": "u1", "message": "hello" })
        );
    }

    #[test]
    fn radar_request_wire_shape() {
        let req = RadarRequest {
            user_id: UserId::new("u1"),
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "user_id": "u1" }));
    }

    #[test]
    fn feed_query_limit_is_optional() {
        let q: FeedQuery = serde_json::from_value(json!({ "user_id": "u1" })).unwrap();
        assert_eq!(q.limit, None);
    }
}
