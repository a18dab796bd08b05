//! Community-wide aggregate queries.

use sqlx::PgPool;

use crate::models::metrics::CommunityTotals;

pub struct MetricsRepo;

impl MetricsRepo {
    /// Row counts of reviews, threads and posts in one round trip.
    pub async fn totals(pool: &PgPool) -> Result<CommunityTotals, sqlx::Error> {
        sqlx::query_as::<_, CommunityTotals>(
            "SELECT \
                (SELECT COUNT(*) FROM reviews) AS reviews, \
                (SELECT COUNT(*) FROM threads) AS threads, \
                (SELECT COUNT(*) FROM posts)   AS posts",
        )
        .fetch_one(pool)
        .await
    }
}
