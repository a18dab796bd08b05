//! Repository for the `breweries` table.

use brewlog_core::resolution::Resolution;
use brewlog_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::brewery::{Brewery, CreateBrewery};

/// Column list for `breweries` queries.
const COLUMNS: &str = "id, name, country, created_at";

/// Provides CRUD and find-or-create operations for breweries.
pub struct BreweryRepo;

impl BreweryRepo {
    /// Insert a new brewery, returning the created row.
    ///
    /// Fails with a unique violation if the exact name is already taken.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateBrewery,
    ) -> Result<Brewery, sqlx::Error> {
        let query = format!(
            "INSERT INTO breweries (name, country) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brewery>(&query)
            .bind(&input.name)
            .bind(&input.country)
            .fetch_one(executor)
            .await
    }

    /// Find a brewery by its internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Brewery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM breweries WHERE id = $1");
        sqlx::query_as::<_, Brewery>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a brewery by exact (case-sensitive) name.
    pub async fn find_by_name(
        executor: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Option<Brewery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM breweries WHERE name = $1");
        sqlx::query_as::<_, Brewery>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Return the brewery named exactly `name`, creating it if absent.
    ///
    /// Safe under concurrent calls with the same name: the insert yields to
    /// `uq_breweries_name` and the winning row is re-read, so exactly one row
    /// exists afterwards.
    pub async fn find_or_create(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Resolution<Brewery>, sqlx::Error> {
        if let Some(existing) = Self::find_by_name(&mut *conn, name).await? {
            return Ok(Resolution::Found(existing));
        }

        let insert = format!(
            "INSERT INTO breweries (name) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_breweries_name DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Brewery>(&insert)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        match created {
            Some(brewery) => {
                tracing::info!(brewery_id = brewery.id, name = %brewery.name, "Brewery created");
                Ok(Resolution::Created(brewery))
            }
            None => {
                tracing::debug!(name, "Brewery created concurrently, using existing row");
                Self::find_by_name(&mut *conn, name)
                    .await?
                    .map(Resolution::Found)
                    .ok_or(sqlx::Error::RowNotFound)
            }
        }
    }

    /// List all breweries ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Brewery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM breweries ORDER BY name, id");
        sqlx::query_as::<_, Brewery>(&query).fetch_all(pool).await
    }

    /// Delete a brewery and, by cascade, its beers and their reviews and threads.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM breweries WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
