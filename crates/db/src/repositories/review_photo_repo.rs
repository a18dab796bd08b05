//! Repository for the `review_photos` table.

use brewlog_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::review::ReviewPhoto;

/// Column list for `review_photos` queries.
const COLUMNS: &str = "id, review_id, image_ref, created_at";

/// Provides insert and listing operations for review photos.
///
/// The per-review cap is enforced by the caller while holding the review
/// row lock (see `ReviewRepo::lock`).
pub struct ReviewPhotoRepo;

impl ReviewPhotoRepo {
    /// Attach an already-stored image to a review.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        review_id: DbId,
        image_ref: &str,
    ) -> Result<ReviewPhoto, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_photos (review_id, image_ref) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewPhoto>(&query)
            .bind(review_id)
            .bind(image_ref)
            .fetch_one(executor)
            .await
    }

    /// Number of photos attached to a review.
    pub async fn count_for_review(
        executor: impl PgExecutor<'_>,
        review_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM review_photos WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(executor)
            .await
    }

    /// Photos of one review, oldest first.
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
    ) -> Result<Vec<ReviewPhoto>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_photos WHERE review_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ReviewPhoto>(&query)
            .bind(review_id)
            .fetch_all(pool)
            .await
    }

    /// Photos of several reviews in one query, oldest first.
    pub async fn list_for_reviews(
        pool: &PgPool,
        review_ids: &[DbId],
    ) -> Result<Vec<ReviewPhoto>, sqlx::Error> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM review_photos \
             WHERE review_id = ANY($1) \
             ORDER BY review_id, created_at, id"
        );
        sqlx::query_as::<_, ReviewPhoto>(&query)
            .bind(review_ids)
            .fetch_all(pool)
            .await
    }
}
