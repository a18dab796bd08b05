//! Repository for the `threads` table.

use brewlog_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::thread::{CreateThread, Thread};

/// Column list for `threads` queries.
const COLUMNS: &str = "id, beer_id, beer_name, title, user_name, user_id, created_at";

/// Provides CRUD operations for discussion threads.
pub struct ThreadRepo;

impl ThreadRepo {
    /// Insert a new thread, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateThread,
    ) -> Result<Thread, sqlx::Error> {
        let query = format!(
            "INSERT INTO threads (beer_id, beer_name, title, user_name, user_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(input.beer_id)
            .bind(&input.beer_name)
            .bind(&input.title)
            .bind(&input.user_name)
            .bind(input.user_id)
            .fetch_one(executor)
            .await
    }

    /// Find a thread by its internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Thread>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM threads WHERE id = $1");
        sqlx::query_as::<_, Thread>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Threads attached to a beer, newest first.
    pub async fn list_for_beer(pool: &PgPool, beer_id: DbId) -> Result<Vec<Thread>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM threads \
             WHERE beer_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Thread>(&query)
            .bind(beer_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_beer(pool: &PgPool, beer_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM threads WHERE beer_id = $1")
            .bind(beer_id)
            .fetch_one(pool)
            .await
    }

    /// Delete a thread and, by cascade, its posts.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
