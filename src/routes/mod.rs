//! HTTP and WebSocket gateway
//!
//! The gateway is the boundary between transports and the core: it
//! translates inbound calls into service/broadcaster invocations and is
//! not itself stateful.
//!
//! - **`api_routes`** - request/response handlers for threads and posts
//! - **`chat_ws`** - the room subscribe socket
//! - **`router`** - route table assembly

/// Request/response handlers
pub mod api_routes;

/// WebSocket subscribe handler
pub mod chat_ws;

/// Route configuration
pub mod router;

pub use router::create_router;
