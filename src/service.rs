//! Thread and post lifecycle orchestration
//!
//! [`ForumService`] is the single writer of truth: every durable mutation,
//! on either transport, goes through one of its methods. `post_message`
//! in particular is the only code path that creates a post, so the REST
//! and WebSocket surfaces can never diverge in validation or in the row
//! they hand to the broadcaster.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::config::Limits;
use crate::error::ApiError;
use crate::shared::model::{Post, Thread};
use crate::{store, validate};

/// Handle to the validation + persistence core; cheap to clone.
#[derive(Clone)]
pub struct ForumService {
    pool: SqlitePool,
    limits: Limits,
}

impl ForumService {
    pub fn new(pool: SqlitePool, limits: Limits) -> Self {
        Self { pool, limits }
    }

    /// Create a thread from an untrusted title.
    ///
    /// Duplicate titles are resolved inside the store's single insert;
    /// two callers racing on the same title cannot both succeed.
    pub async fn create_thread(&self, title: &str) -> Result<Thread, ApiError> {
        let title = validate::validate_title(title, &self.limits)?;
        let thread = store::create_thread(&self.pool, &title, Utc::now()).await?;
        tracing::info!(thread_id = thread.id, "thread created");
        Ok(thread)
    }

    /// List all threads, newest first.
    pub async fn list_threads(&self) -> Result<Vec<Thread>, ApiError> {
        store::list_threads(&self.pool).await
    }

    /// Delete a thread and, by cascade, all of its posts.
    pub async fn delete_thread(&self, id: i64) -> Result<(), ApiError> {
        store::delete_thread(&self.pool, id).await?;
        tracing::info!(thread_id = id, "thread deleted");
        Ok(())
    }

    /// Unconditionally discard every thread and post.
    ///
    /// Destructive and irreversible; obtaining confirmation is the
    /// calling client's concern, not the service's.
    pub async fn wipe_all(&self) -> Result<(), ApiError> {
        store::wipe_all(&self.pool).await?;
        tracing::warn!("all threads wiped");
        Ok(())
    }

    /// Validate and persist a message, returning the stored row with its
    /// assigned identity and timestamp.
    ///
    /// The sole entry point for creating posts, shared by the
    /// request/response and subscribe paths.
    pub async fn post_message(
        &self,
        thread_id: i64,
        username: Option<&str>,
        content: &str,
    ) -> Result<Post, ApiError> {
        let username = validate::validate_username(username, &self.limits)?;
        let content = validate::validate_content(content, &self.limits)?;
        store::create_post(&self.pool, thread_id, &username, &content, Utc::now()).await
    }

    /// List a thread's posts, oldest first.
    pub async fn list_posts(&self, thread_id: i64) -> Result<Vec<Post>, ApiError> {
        store::list_posts(&self.pool, thread_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::db::test_pool;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    async fn service() -> ForumService {
        ForumService::new(test_pool().await, Limits::default())
    }

    #[tokio::test]
    async fn test_create_thread_trims_title() {
        let service = service().await;
        let thread = service.create_thread("  General  ").await.unwrap();
        assert_eq!(thread.title, "General");
    }

    #[tokio::test]
    async fn test_duplicate_title_detected_after_trim() {
        let service = service().await;
        service.create_thread("General").await.unwrap();

        let error = service.create_thread("   General ").await.unwrap_err();
        assert_matches!(error, ApiError::Duplicate { .. });
        assert_eq!(service.list_threads().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_racing_identical_titles_have_one_winner() {
        let service = service().await;
        let (a, b) = tokio::join!(
            service.create_thread("General"),
            service.create_thread("General"),
        );
        assert!(a.is_ok() != b.is_ok());
        assert_eq!(service.list_threads().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_post_message_defaults_username() {
        let service = service().await;
        let thread = service.create_thread("General").await.unwrap();

        let post = service.post_message(thread.id, None, "hello").await.unwrap();
        assert_eq!(post.username, "Anonymous");

        let post = service
            .post_message(thread.id, Some("   "), "again")
            .await
            .unwrap();
        assert_eq!(post.username, "Anonymous");
    }

    #[tokio::test]
    async fn test_over_limit_content_leaves_thread_unchanged() {
        let service = ForumService::new(
            test_pool().await,
            Limits {
                post_content: 8,
                ..Limits::default()
            },
        );
        let thread = service.create_thread("General").await.unwrap();

        let error = service
            .post_message(thread.id, Some("alice"), "123456789")
            .await
            .unwrap_err();
        assert_matches!(error, ApiError::Validation { field: "content", .. });
        assert!(service.list_posts(thread.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_to_missing_thread() {
        let service = service().await;
        let error = service.post_message(7, Some("alice"), "hi").await.unwrap_err();
        assert_matches!(error, ApiError::NotFound { entity: "thread" });
    }

    #[tokio::test]
    async fn test_full_lifecycle_walkthrough() {
        let service = service().await;

        let thread = service.create_thread("General").await.unwrap();
        assert_eq!(thread.id, 1);

        let post = service
            .post_message(thread.id, Some("alice"), "hello")
            .await
            .unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.thread_id, 1);

        let posts = service.list_posts(thread.id).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].username, "alice");
        assert_eq!(posts[0].content, "hello");

        service.delete_thread(thread.id).await.unwrap();
        let error = service.list_posts(thread.id).await.unwrap_err();
        assert_matches!(error, ApiError::NotFound { .. });
    }

    #[tokio::test]
    async fn test_wipe_then_create_succeeds() {
        let service = service().await;
        service.create_thread("General").await.unwrap();
        service.wipe_all().await.unwrap();

        let thread = service.create_thread("General").await.unwrap();
        assert_eq!(service.list_threads().await.unwrap(), vec![thread]);
    }
}
