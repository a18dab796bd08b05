//! Repository for the `posts` table.

use brewlog_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::post::{CreatePost, Post};

/// Column list for `posts` queries.
const COLUMNS: &str = "id, thread_id, user_name, body, is_hidden, created_at";

/// Provides CRUD and visibility operations for thread posts.
pub struct PostRepo;

impl PostRepo {
    /// Append a post to a thread.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        thread_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (thread_id, user_name, body) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(thread_id)
            .bind(&input.user_name)
            .bind(&input.body)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Posts shown to readers: not hidden, oldest first.
    pub async fn list_visible_for_thread(
        pool: &PgPool,
        thread_id: DbId,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts \
             WHERE thread_id = $1 AND NOT is_hidden \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(thread_id)
            .fetch_all(pool)
            .await
    }

    /// Every post of a thread, hidden ones included, oldest first.
    pub async fn list_all_for_thread(
        pool: &PgPool,
        thread_id: DbId,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts WHERE thread_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(thread_id)
            .fetch_all(pool)
            .await
    }

    /// Set a post's hidden flag. Returns `false` if the post does not exist.
    pub async fn set_hidden(
        executor: impl PgExecutor<'_>,
        id: DbId,
        hidden: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE posts SET is_hidden = $2 WHERE id = $1")
            .bind(id)
            .bind(hidden)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
