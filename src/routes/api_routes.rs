//! REST surface for threads and posts
//!
//! Handlers translate service outcomes onto transport status codes:
//! success returns the row payload (201 for creations), validation and
//! duplicate failures return 400 with the violated constraint, missing
//! entities return 404, and storage failures surface as a generic 500.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::rooms::RoomRegistry;
use crate::service::ForumService;
use crate::shared::event::RoomEvent;

/// Payload for `POST /api/threads`.
#[derive(Debug, Deserialize)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub title: String,
}

/// Payload for `POST /api/threads/{thread_id}/posts`.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// `GET /api/threads` - all threads, newest first.
pub async fn list_threads(
    State(service): State<ForumService>,
) -> Result<impl IntoResponse, ApiError> {
    let threads = service.list_threads().await?;
    Ok(Json(threads))
}

/// `POST /api/threads` - create a thread.
pub async fn create_thread(
    State(service): State<ForumService>,
    Json(req): Json<CreateThreadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = service.create_thread(&req.title).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

/// `GET /api/threads/{thread_id}/posts` - a thread's posts, oldest first.
pub async fn list_posts(
    State(service): State<ForumService>,
    Path(thread_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = service.list_posts(thread_id).await?;
    Ok(Json(posts))
}

/// `POST /api/threads/{thread_id}/posts` - persist a post.
///
/// The persisted row is returned to the caller and handed to the
/// thread's room, so subscribers observe exactly the row the caller got
/// back.
pub async fn create_post(
    State(service): State<ForumService>,
    State(rooms): State<RoomRegistry>,
    Path(thread_id): Path<i64>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = service
        .post_message(thread_id, req.username.as_deref(), &req.content)
        .await?;
    rooms.broadcast(thread_id, RoomEvent::new_post(post.clone()));
    Ok((StatusCode::CREATED, Json(post)))
}

/// `DELETE /api/threads/{thread_id}` - delete a thread and its posts.
pub async fn delete_thread(
    State(service): State<ForumService>,
    Path(thread_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    service.delete_thread(thread_id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

/// `DELETE /api/threads/wipe` - unconditionally destroy all threads and
/// posts.
pub async fn wipe_threads(
    State(service): State<ForumService>,
) -> Result<impl IntoResponse, ApiError> {
    service.wipe_all().await?;
    Ok(Json(json!({ "status": "all threads wiped" })))
}
