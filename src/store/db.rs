//! Database operations for threads and posts
//!
//! Every write either fully applies or leaves the previous state intact:
//! creations are single `INSERT .. RETURNING` statements, thread deletion
//! leans on the `ON DELETE CASCADE` constraint inside one statement, and
//! the wipe runs in a transaction. Uniqueness and referential integrity
//! races are resolved by database constraints, not by check-then-act
//! sequences in application code.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::shared::model::{Post, Thread};

/// Open a connection pool, creating the database file if needed.
///
/// Foreign key enforcement is switched on for every connection; the
/// cascade from threads to posts depends on it.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await
}

/// Open an isolated in-memory database. A single pooled connection keeps
/// every operation on the same database instance.
pub async fn connect_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Insert a new thread.
///
/// The UNIQUE constraint on `title` resolves concurrent same-title
/// creation: exactly one insert wins and the loser gets
/// [`ApiError::Duplicate`].
pub async fn create_thread(
    pool: &SqlitePool,
    title: &str,
    now: DateTime<Utc>,
) -> Result<Thread, ApiError> {
    sqlx::query_as::<_, Thread>(
        r#"
        INSERT INTO threads (title, created_at)
        VALUES (?1, ?2)
        RETURNING id, title, created_at
        "#,
    )
    .bind(title)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::duplicate("thread with this title already exists")
        } else {
            ApiError::from(e)
        }
    })
}

/// List all threads, most recently created first.
pub async fn list_threads(pool: &SqlitePool) -> Result<Vec<Thread>, ApiError> {
    let threads = sqlx::query_as::<_, Thread>(
        "SELECT id, title, created_at FROM threads ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(threads)
}

/// Fetch a single thread by id.
pub async fn get_thread(pool: &SqlitePool, id: i64) -> Result<Option<Thread>, ApiError> {
    let thread =
        sqlx::query_as::<_, Thread>("SELECT id, title, created_at FROM threads WHERE id = ?1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(thread)
}

/// Delete a thread; the FK cascade removes its posts in the same
/// statement, so no reader can observe the thread without its posts gone.
pub async fn delete_thread(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM threads WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("thread"));
    }
    Ok(())
}

/// Discard every thread and post in one transaction.
///
/// The AUTOINCREMENT sequence is left intact so wiped identities are
/// never issued again for the lifetime of the database.
pub async fn wipe_all(pool: &SqlitePool) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM posts").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM threads").execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}

/// Insert a new post.
///
/// A single statement with foreign keys enforced: posting into a missing
/// thread fails as [`ApiError::NotFound`] with no row created and no
/// check-then-insert window.
pub async fn create_post(
    pool: &SqlitePool,
    thread_id: i64,
    username: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<Post, ApiError> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (thread_id, username, content, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, thread_id, username, content, created_at
        "#,
    )
    .bind(thread_id)
    .bind(username)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::not_found("thread")
        } else {
            ApiError::from(e)
        }
    })
}

/// List a thread's posts in creation order.
///
/// The existence check and the select share one transaction, so a
/// concurrent cascade delete is observed either entirely or not at all;
/// an absent thread is NotFound, never an empty list.
pub async fn list_posts(pool: &SqlitePool, thread_id: i64) -> Result<Vec<Post>, ApiError> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM threads WHERE id = ?1")
        .bind(thread_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(ApiError::not_found("thread"));
    }

    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, thread_id, username, content, created_at
        FROM posts
        WHERE thread_id = ?1
        ORDER BY id ASC
        "#,
    )
    .bind(thread_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(posts)
}

/// Fetch a single post by id.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, ApiError> {
    let post = sqlx::query_as::<_, Post>(
        "SELECT id, thread_id, username, content, created_at FROM posts WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Fresh migrated in-memory pool for tests across the crate.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = connect_memory().await.expect("in-memory pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_thread_ids_strictly_increase() {
        let pool = test_pool().await;
        let a = create_thread(&pool, "first", Utc::now()).await.unwrap();
        let b = create_thread(&pool, "second", Utc::now()).await.unwrap();
        let c = create_thread(&pool, "third", Utc::now()).await.unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[tokio::test]
    async fn test_list_threads_newest_first() {
        let pool = test_pool().await;
        create_thread(&pool, "first", Utc::now()).await.unwrap();
        create_thread(&pool, "second", Utc::now()).await.unwrap();

        let threads = list_threads(&pool).await.unwrap();
        let titles: Vec<&str> = threads.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let pool = test_pool().await;
        create_thread(&pool, "General", Utc::now()).await.unwrap();

        let error = create_thread(&pool, "General", Utc::now()).await.unwrap_err();
        assert_matches!(error, ApiError::Duplicate { .. });
        assert_eq!(list_threads(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_thread_cascades_posts() {
        let pool = test_pool().await;
        let thread = create_thread(&pool, "General", Utc::now()).await.unwrap();
        let post = create_post(&pool, thread.id, "alice", "hello", Utc::now())
            .await
            .unwrap();

        delete_thread(&pool, thread.id).await.unwrap();

        assert_eq!(get_thread(&pool, thread.id).await.unwrap(), None);
        assert_eq!(get_post(&pool, post.id).await.unwrap(), None);
        let error = list_posts(&pool, thread.id).await.unwrap_err();
        assert_matches!(error, ApiError::NotFound { entity: "thread" });
    }

    #[tokio::test]
    async fn test_delete_missing_thread_not_found() {
        let pool = test_pool().await;
        let error = delete_thread(&pool, 42).await.unwrap_err();
        assert_matches!(error, ApiError::NotFound { .. });
    }

    #[tokio::test]
    async fn test_identities_survive_deletion() {
        let pool = test_pool().await;
        let a = create_thread(&pool, "first", Utc::now()).await.unwrap();
        delete_thread(&pool, a.id).await.unwrap();

        let b = create_thread(&pool, "second", Utc::now()).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_wipe_all_preserves_identity_sequence() {
        let pool = test_pool().await;
        let thread = create_thread(&pool, "General", Utc::now()).await.unwrap();
        create_post(&pool, thread.id, "alice", "hello", Utc::now())
            .await
            .unwrap();

        wipe_all(&pool).await.unwrap();
        assert!(list_threads(&pool).await.unwrap().is_empty());

        let fresh = create_thread(&pool, "General", Utc::now()).await.unwrap();
        assert!(fresh.id > thread.id);
    }

    #[tokio::test]
    async fn test_post_to_missing_thread_creates_no_row() {
        let pool = test_pool().await;
        let error = create_post(&pool, 99, "alice", "hello", Utc::now())
            .await
            .unwrap_err();
        assert_matches!(error, ApiError::NotFound { entity: "thread" });
        assert_eq!(get_post(&pool, 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_post_round_trip() {
        let pool = test_pool().await;
        let thread = create_thread(&pool, "General", Utc::now()).await.unwrap();
        let other = create_thread(&pool, "Other", Utc::now()).await.unwrap();

        let post = create_post(&pool, thread.id, "alice", "hello", Utc::now())
            .await
            .unwrap();
        // Unrelated posts to another thread must not affect it.
        create_post(&pool, other.id, "bob", "noise", Utc::now())
            .await
            .unwrap();

        let listed = list_posts(&pool, thread.id).await.unwrap();
        assert_eq!(listed, vec![post]);
    }

    #[tokio::test]
    async fn test_list_posts_in_creation_order() {
        let pool = test_pool().await;
        let thread = create_thread(&pool, "General", Utc::now()).await.unwrap();
        for n in 1..=3 {
            create_post(&pool, thread.id, "alice", &format!("msg {n}"), Utc::now())
                .await
                .unwrap();
        }

        let posts = list_posts(&pool, thread.id).await.unwrap();
        let contents: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["msg 1", "msg 2", "msg 3"]);
        assert!(posts.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_post_ids_global_across_threads() {
        let pool = test_pool().await;
        let a = create_thread(&pool, "A", Utc::now()).await.unwrap();
        let b = create_thread(&pool, "B", Utc::now()).await.unwrap();

        let p1 = create_post(&pool, a.id, "alice", "one", Utc::now()).await.unwrap();
        let p2 = create_post(&pool, b.id, "bob", "two", Utc::now()).await.unwrap();
        let p3 = create_post(&pool, a.id, "alice", "three", Utc::now()).await.unwrap();
        assert!(p1.id < p2.id && p2.id < p3.id);
    }
}
