//! Per-thread publish/subscribe rooms
//!
//! Rooms are in-memory only: a restart loses all membership but never
//! durable thread/post data. Ordering guarantee: events broadcast to one
//! room reach each individual member in publication order; nothing is
//! promised across members or across threads.

/// Room registry and fan-out
pub mod broadcast;

pub use broadcast::{ConnId, RoomRegistry};
