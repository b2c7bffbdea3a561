//! Wire-format types shared by both transport surfaces
//!
//! Entities and events here are the contract with clients: the REST API
//! and the WebSocket subscribe layer serialize exactly these shapes.

/// Thread and post entities
pub mod model;

/// Room and client event types
pub mod event;

pub use event::{ClientEvent, RoomEvent};
pub use model::{Post, Thread};
