//! Brewery entity model and DTOs.

use brewlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `breweries` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Brewery {
    pub id: DbId,
    pub name: String,
    pub country: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a brewery administratively.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrewery {
    pub name: String,
    pub country: Option<String>,
}
