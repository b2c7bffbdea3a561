//! Thread-room discussion server
//!
//! A small real-time discussion service: threads and posts persist in
//! SQLite behind a request/response HTTP API, while a WebSocket subscribe
//! layer delivers every durable write, in order, to the clients currently
//! watching a thread.
//!
//! # Architecture
//!
//! ```text
//! threadboard/
//! ├── config   - startup configuration (TOML file + environment)
//! ├── error    - error taxonomy and HTTP mapping
//! ├── validate - pure field validation
//! ├── store    - SQLite persistence
//! ├── service  - thread/post lifecycle, the single writer of truth
//! ├── rooms    - per-thread pub/sub rooms
//! ├── routes   - HTTP + WebSocket gateway
//! ├── server   - state assembly and initialization
//! └── shared   - wire-format entities and events
//! ```
//!
//! Both transports converge on `service::ForumService::post_message`, so
//! a synchronous create and a subscribe-layer send can never diverge in
//! validation or in the row they broadcast.

/// Startup configuration
pub mod config;

/// Error taxonomy
pub mod error;

/// Per-thread pub/sub rooms
pub mod rooms;

/// HTTP and WebSocket gateway
pub mod routes;

/// Server setup and state
pub mod server;

/// Thread/post lifecycle service
pub mod service;

/// Wire-format types
pub mod shared;

/// SQLite persistence
pub mod store;

/// Pure field validation
pub mod validate;

pub use config::{AppConfig, Limits};
pub use error::ApiError;
pub use rooms::RoomRegistry;
pub use server::{create_app, AppState};
pub use service::ForumService;
pub use shared::{ClientEvent, Post, RoomEvent, Thread};
