//! Beer entity model and DTOs.

use brewlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `beers` table.
///
/// `avg_rating` is derived from the beer's reviews and rewritten on every
/// review mutation; it is never edited directly.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Beer {
    pub id: DbId,
    pub brewery_id: DbId,
    pub name: String,
    pub style: String,
    pub abv: Option<f64>,
    pub avg_rating: f64,
    pub created_at: Timestamp,
}

/// DTO for creating a beer administratively.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBeer {
    pub brewery_id: DbId,
    pub name: String,
    pub style: String,
    pub abv: Option<f64>,
}

/// A beer together with how many reviews it has.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RatedBeer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub beer: Beer,
    pub review_count: i64,
}

/// Catalog listing filters. Every field is optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BeerFilter {
    /// Case-insensitive substring of the beer name.
    pub q: Option<String>,
    /// Exact style.
    pub style: Option<String>,
    pub brewery_id: Option<DbId>,
    /// Inclusive lower bound on `avg_rating`.
    pub min_rating: Option<f64>,
}
