//! Community-wide counters.

use serde::Serialize;
use sqlx::FromRow;

/// Row counts shown on the staff metrics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct CommunityTotals {
    pub reviews: i64,
    pub threads: i64,
    pub posts: i64,
}
