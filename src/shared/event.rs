//! Room event types
//!
//! `RoomEvent` is what a room delivers to its members; `ClientEvent` is
//! what a connected client may send over the subscribe socket. Both are
//! externally tagged on an `event` field so the wire format stays
//! self-describing.

use serde::{Deserialize, Serialize};

use crate::shared::model::Post;

/// Event delivered to every member of a thread's room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A post was persisted to the thread. Carries exactly the row the
    /// request/response caller got back.
    NewPost(Post),
    /// Informational membership notice (joins, leaves).
    Status { msg: String },
}

impl RoomEvent {
    /// Create a new-post event.
    pub fn new_post(post: Post) -> Self {
        Self::NewPost(post)
    }

    /// Create a membership status notice.
    pub fn status(msg: impl Into<String>) -> Self {
        Self::Status { msg: msg.into() }
    }
}

/// Inbound command parsed from a WebSocket frame.
///
/// Frames that fail to parse into one of these variants are dropped by
/// the gateway; the subscribe path has no error channel back to the
/// sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Subscribe to a thread's room.
    Join {
        thread_id: i64,
        #[serde(default)]
        username: Option<String>,
    },
    /// Unsubscribe from a thread's room.
    Leave { thread_id: i64 },
    /// Persist a message and broadcast it to the thread's room.
    SendMessage {
        thread_id: i64,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        content: String,
    },
}
