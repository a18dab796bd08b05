//! Repository for the `reports` table.

use brewlog_core::moderation::{ReportForm, ReportTarget, STATUS_CLOSED, STATUS_OPEN};
use brewlog_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::report::{Report, TargetLookup};
use crate::repositories::{PostRepo, ReviewRepo};

/// Column list for `reports` queries.
const COLUMNS: &str =
    "id, object_type, object_id, user_name, reason, status, created_at, closed_at";

/// Provides creation, listing and closing of moderation reports.
pub struct ReportRepo;

impl ReportRepo {
    /// File a new open report. The target is not required to exist.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        target: ReportTarget,
        form: &ReportForm,
    ) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (object_type, object_id, user_name, reason, status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(target.object_type())
            .bind(target.object_id())
            .bind(&form.user_name)
            .bind(&form.reason)
            .bind(STATUS_OPEN)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find and lock a report so concurrent actions on it serialize.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Open reports, newest first.
    pub async fn list_open(pool: &PgPool) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports \
             WHERE status = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(STATUS_OPEN)
            .fetch_all(pool)
            .await
    }

    /// Mark a report closed. Closing twice keeps the first `closed_at`.
    pub async fn close(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "UPDATE reports SET status = $2, closed_at = COALESCE(closed_at, now()) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(STATUS_CLOSED)
            .fetch_optional(executor)
            .await
    }

    /// Follow a report's weak reference to the current state of its target.
    pub async fn resolve_target(
        conn: &mut PgConnection,
        target: ReportTarget,
    ) -> Result<TargetLookup, sqlx::Error> {
        let lookup = match target {
            ReportTarget::Post(id) => PostRepo::find_by_id(&mut *conn, id)
                .await?
                .map_or(TargetLookup::Absent, TargetLookup::Post),
            ReportTarget::Review(id) => ReviewRepo::find_by_id(&mut *conn, id)
                .await?
                .map_or(TargetLookup::Absent, TargetLookup::Review),
        };
        Ok(lookup)
    }
}
