//! Entity types for threads and posts
//!
//! These structs define the external representation used uniformly by the
//! REST and WebSocket surfaces: the serde field names are the wire format,
//! and timestamps serialize as RFC 3339 UTC strings. The same structs map
//! directly onto database rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, persistent discussion container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Thread {
    /// Store-assigned identity; unique and monotonically increasing,
    /// never reused after deletion.
    pub id: i64,
    /// Trimmed title, unique among live threads.
    pub title: String,
    /// UTC creation time, assigned at insert and immutable.
    pub created_at: DateTime<Utc>,
}

/// A single timestamped contribution to a thread.
///
/// Post identity is unique across the whole table, not per thread, which
/// keeps ordering reasoning simple: creation order equals id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Store-assigned identity, monotonic across all threads.
    pub id: i64,
    /// The thread this post belongs to.
    pub thread_id: i64,
    /// Display name of the author; `"Anonymous"` when none was given.
    pub username: String,
    /// Trimmed message body.
    pub content: String,
    /// UTC creation time, assigned at insert and immutable.
    pub created_at: DateTime<Utc>,
}
