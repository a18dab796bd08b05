//! Repository for the `beers` table.

use brewlog_core::resolution::{NewBeer, Resolution};
use brewlog_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::beer::{Beer, BeerFilter, CreateBeer, RatedBeer};
use crate::repositories::BreweryRepo;

/// Column list for `beers` queries.
const COLUMNS: &str = "id, brewery_id, name, style, abv, avg_rating, created_at";

/// Column list qualified with the `b` alias, for joins.
const COLUMNS_B: &str =
    "b.id, b.brewery_id, b.name, b.style, b.abv, b.avg_rating, b.created_at";

/// Provides CRUD, lookup and catalog queries for beers.
pub struct BeerRepo;

impl BeerRepo {
    /// Insert a new beer with `avg_rating = 0`, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateBeer,
    ) -> Result<Beer, sqlx::Error> {
        let query = format!(
            "INSERT INTO beers (brewery_id, name, style, abv) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Beer>(&query)
            .bind(input.brewery_id)
            .bind(&input.name)
            .bind(&input.style)
            .bind(input.abv)
            .fetch_one(executor)
            .await
    }

    /// Find a beer by its internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Beer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beers WHERE id = $1");
        sqlx::query_as::<_, Beer>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a beer whose name matches `name` ignoring case.
    ///
    /// If duplicates exist the oldest row wins.
    pub async fn find_by_name_ci(
        executor: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Option<Beer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM beers \
             WHERE LOWER(name) = LOWER($1) \
             ORDER BY id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Beer>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Return the beer named `new_beer.name` (case-insensitive), creating it if absent.
    ///
    /// An existing beer is returned untouched; its style and brewery
    /// only apply to a newly created row. The brewery is itself found or
    /// created by exact name. Concurrent calls for the same name converge on
    /// one row through `uq_beers_name_ci`.
    pub async fn find_or_create_by_name(
        conn: &mut PgConnection,
        new_beer: &NewBeer,
    ) -> Result<Resolution<Beer>, sqlx::Error> {
        if let Some(existing) = Self::find_by_name_ci(&mut *conn, &new_beer.name).await? {
            return Ok(Resolution::Found(existing));
        }

        let brewery = BreweryRepo::find_or_create(&mut *conn, &new_beer.brewery_name)
            .await?
            .into_inner();

        let insert = format!(
            "INSERT INTO beers (brewery_id, name, style) \
             VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Beer>(&insert)
            .bind(brewery.id)
            .bind(&new_beer.name)
            .bind(&new_beer.style)
            .fetch_optional(&mut *conn)
            .await?;

        match created {
            Some(beer) => {
                tracing::info!(
                    beer_id = beer.id,
                    brewery_id = brewery.id,
                    name = %beer.name,
                    "Beer created from free text",
                );
                Ok(Resolution::Created(beer))
            }
            None => {
                tracing::debug!(name = %new_beer.name, "Beer created concurrently, using existing row");
                Self::find_by_name_ci(&mut *conn, &new_beer.name)
                    .await?
                    .map(Resolution::Found)
                    .ok_or(sqlx::Error::RowNotFound)
            }
        }
    }

    /// Lock a beer row for the rest of the transaction.
    ///
    /// Uses `FOR NO KEY UPDATE` so it does not conflict with the key-share
    /// locks that review inserts take through their foreign key.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Beer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beers WHERE id = $1 FOR NO KEY UPDATE");
        sqlx::query_as::<_, Beer>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Overwrite the cached average rating.
    pub async fn set_avg_rating(
        executor: impl PgExecutor<'_>,
        id: DbId,
        avg_rating: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE beers SET avg_rating = $2 WHERE id = $1")
            .bind(id)
            .bind(avg_rating)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List beers matching `filter`, ordered by name.
    pub async fn search(pool: &PgPool, filter: &BeerFilter) -> Result<Vec<Beer>, sqlx::Error> {
        let q = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());
        let style = filter
            .style
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if q.is_some() {
            conditions.push(format!("name ILIKE ${param_idx}"));
            param_idx += 1;
        }
        if style.is_some() {
            conditions.push(format!("style = ${param_idx}"));
            param_idx += 1;
        }
        if filter.brewery_id.is_some() {
            conditions.push(format!("brewery_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.min_rating.is_some() {
            conditions.push(format!("avg_rating >= ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT {COLUMNS} FROM beers {where_clause} ORDER BY name, id");
        let mut query_builder = sqlx::query_as::<_, Beer>(&query);

        if let Some(q) = q {
            query_builder = query_builder.bind(format!("%{}%", escape_like(q)));
        }
        if let Some(s) = style {
            query_builder = query_builder.bind(s);
        }
        if let Some(brewery_id) = filter.brewery_id {
            query_builder = query_builder.bind(brewery_id);
        }
        if let Some(min_rating) = filter.min_rating {
            query_builder = query_builder.bind(min_rating);
        }

        query_builder.fetch_all(pool).await
    }

    /// Distinct styles present in the catalog, sorted.
    pub async fn list_styles(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT style FROM beers ORDER BY style")
            .fetch_all(pool)
            .await
    }

    /// Highest-rated beers having at least `min_reviews` reviews.
    ///
    /// Ties on rating are broken by ID so results are stable.
    pub async fn top_rated(
        pool: &PgPool,
        min_reviews: i64,
        limit: i64,
    ) -> Result<Vec<RatedBeer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_B}, COUNT(r.id) AS review_count \
             FROM beers b \
             LEFT JOIN reviews r ON r.beer_id = b.id \
             GROUP BY b.id \
             HAVING COUNT(r.id) >= $1 \
             ORDER BY b.avg_rating DESC, b.id \
             LIMIT $2"
        );
        sqlx::query_as::<_, RatedBeer>(&query)
            .bind(min_reviews)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a beer and, by cascade, its reviews and threads.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100% malta_x"), "100\\% malta\\_x");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("Kölsch"), "Kölsch");
    }
}
