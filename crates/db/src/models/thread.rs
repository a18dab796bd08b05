//! Discussion thread model and DTOs.

use brewlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `threads` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Thread {
    pub id: DbId,
    /// `None` when the thread is not linked to a catalog beer.
    pub beer_id: Option<DbId>,
    /// Free-text beer name kept for unlinked threads.
    pub beer_name: Option<String>,
    pub title: String,
    pub user_name: String,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThread {
    pub beer_id: Option<DbId>,
    pub beer_name: Option<String>,
    pub title: String,
    pub user_name: String,
    pub user_id: Option<DbId>,
}
