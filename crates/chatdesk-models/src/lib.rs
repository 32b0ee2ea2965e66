#![deny(missing_docs)]

//! # Chatdesk Models
//!
//! Core data types shared by the Chatdesk client, its SDK and the mock
//! backend.
//!
//! ## Data flow
//!
//! ```text
//! Operation ──(HTTP)──▶ body text ──parse_body──▶ serde_json::Value
//!                                                    │
//!                                        Response::classify
//!                                                    │
//!                                                    ▼
//!                      Response::{Reply, ErrorMsg, HistoryList, RawPayload}
//!                                                    │
//!                                            render_bubbles
//!                                                    ▼
//!                                        Vec<DisplayBubble> (bot)
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`user`] | `UserId` and identifier resolution |
//! | [`bubble`] | `Sender` and `DisplayBubble` |
//! | [`turn`] | `ChatTurn` history records |
//! | [`operation`] | `Operation` / `OperationKind` user actions |
//! | [`request`] | Request and reply DTOs for the backend endpoints |
//! | [`routes`] | Canonical endpoint paths |
//! | [`response`] | Body parsing, classification and rendering |

pub mod bubble;
pub mod operation;
pub mod request;
pub mod response;
pub mod routes;
pub mod turn;
pub mod user;

// Re-export all public types at crate root for convenience.
pub use bubble::*;
pub use operation::*;
pub use request::*;
pub use response::*;
pub use routes::*;
pub use turn::*;
pub use user::*;
