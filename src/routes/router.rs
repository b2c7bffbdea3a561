//! Router configuration
//!
//! Routes are registered REST surface first, then the WebSocket
//! subscribe endpoint, then a 404 fallback. `/api/threads/wipe` sits
//! alongside the parameterized delete; the router prefers the static
//! segment, so both URLs coexist.

use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::Router;

use crate::routes::{api_routes, chat_ws};
use crate::server::state::AppState;

/// Create the axum router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/threads",
            get(api_routes::list_threads).post(api_routes::create_thread),
        )
        .route("/api/threads/wipe", delete(api_routes::wipe_threads))
        .route("/api/threads/{thread_id}", delete(api_routes::delete_thread))
        .route(
            "/api/threads/{thread_id}/posts",
            get(api_routes::list_posts).post(api_routes::create_post),
        )
        .route("/ws/chat", get(chat_ws::chat_ws))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .with_state(state)
}
