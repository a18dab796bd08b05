//! Moderation report model.

use brewlog_core::error::CoreError;
use brewlog_core::moderation::{ReportStatus, ReportTarget};
use brewlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::post::Post;
use crate::models::review::Review;

/// A row from the `reports` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub object_type: String,
    pub object_id: DbId,
    pub user_name: String,
    pub reason: String,
    pub status: String,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

impl Report {
    /// Typed view of `(object_type, object_id)`.
    pub fn target(&self) -> Result<ReportTarget, CoreError> {
        ReportTarget::from_parts(&self.object_type, self.object_id)
    }

    pub fn status(&self) -> Result<ReportStatus, CoreError> {
        self.status.parse()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status(), Ok(ReportStatus::Open))
    }
}

/// Result of following a report's weak reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "object", rename_all = "snake_case")]
pub enum TargetLookup {
    Post(Post),
    Review(Review),
    /// The referenced object no longer exists (or never did).
    Absent,
}

impl TargetLookup {
    pub fn is_absent(&self) -> bool {
        matches!(self, TargetLookup::Absent)
    }
}
