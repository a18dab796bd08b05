//! Repository for the `reviews` table and the beer rating aggregate.

use brewlog_core::rating::{average_rating, AxisScores};
use brewlog_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::review::{Review, ReviewFields};
use crate::repositories::BeerRepo;

/// Column list for `reviews` queries.
const COLUMNS: &str = "\
    id, beer_id, user_name, brand, brewery_name, comment, \
    aroma, sabor, cuerpo, apariencia, created_at, updated_at";

/// Provides CRUD operations for reviews and keeps `beers.avg_rating` in sync.
///
/// The write methods do not recompute the aggregate themselves; callers run
/// [`ReviewRepo::recompute_beer_rating`] in the same transaction.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review for `beer_id`, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        beer_id: DbId,
        input: &ReviewFields,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews \
                (beer_id, user_name, brand, brewery_name, comment, \
                 aroma, sabor, cuerpo, apariencia) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(beer_id)
            .bind(&input.user_name)
            .bind(&input.brand)
            .bind(&input.brewery_name)
            .bind(&input.comment)
            .bind(input.aroma)
            .bind(input.sabor)
            .bind(input.cuerpo)
            .bind(input.apariencia)
            .fetch_one(executor)
            .await
    }

    /// Find a review by its internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find and lock a review for the rest of the transaction.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1 FOR NO KEY UPDATE");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Replace a review's content and ratings. The beer link is unchanged.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &ReviewFields,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET \
                user_name = $2, brand = $3, brewery_name = $4, comment = $5, \
                aroma = $6, sabor = $7, cuerpo = $8, apariencia = $9, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&input.user_name)
            .bind(&input.brand)
            .bind(&input.brewery_name)
            .bind(&input.comment)
            .bind(input.aroma)
            .bind(input.sabor)
            .bind(input.cuerpo)
            .bind(input.apariencia)
            .fetch_optional(executor)
            .await
    }

    /// Delete a review, returning the beer it belonged to.
    pub async fn delete(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("DELETE FROM reviews WHERE id = $1 RETURNING beer_id")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List a beer's reviews, newest first.
    pub async fn list_for_beer(pool: &PgPool, beer_id: DbId) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews \
             WHERE beer_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(beer_id)
            .fetch_all(pool)
            .await
    }

    /// Axis scores of every review of a beer.
    pub async fn scores_for_beer(
        executor: impl PgExecutor<'_>,
        beer_id: DbId,
    ) -> Result<Vec<AxisScores>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (i16, i16, i16, i16)>(
            "SELECT aroma, sabor, cuerpo, apariencia FROM reviews WHERE beer_id = $1",
        )
        .bind(beer_id)
        .fetch_all(executor)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(aroma, sabor, cuerpo, apariencia)| {
                AxisScores::new(aroma, sabor, cuerpo, apariencia)
            })
            .collect())
    }

    /// Recompute and persist a beer's `avg_rating` from its current reviews.
    ///
    /// Must run in the transaction that mutated the reviews. The beer row is
    /// locked first, so concurrent recomputations for the same beer run one
    /// after the other and the later one reads the earlier one's review.
    /// Returns the stored value.
    pub async fn recompute_beer_rating(
        conn: &mut PgConnection,
        beer_id: DbId,
    ) -> Result<f64, sqlx::Error> {
        BeerRepo::lock(&mut *conn, beer_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let scores = Self::scores_for_beer(&mut *conn, beer_id).await?;
        let avg_rating = average_rating(&scores);
        BeerRepo::set_avg_rating(&mut *conn, beer_id, avg_rating).await?;

        tracing::debug!(beer_id, reviews = scores.len(), avg_rating, "Beer rating recomputed");
        Ok(avg_rating)
    }

    /// Total number of reviews.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews")
            .fetch_one(pool)
            .await
    }

    /// Number of reviews of one beer.
    pub async fn count_for_beer(pool: &PgPool, beer_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE beer_id = $1")
            .bind(beer_id)
            .fetch_one(pool)
            .await
    }
}
