//! Reports and moderation actions.
//!
//! Filing a report never checks that the target exists. Moderation actions
//! tolerate targets deleted since: hiding a missing post changes nothing
//! and is not an error.

use brewlog_core::actor::Actor;
use brewlog_core::error::CoreError;
use brewlog_core::moderation::{
    validate_report_form, validate_transition, ModerationAction, ReportForm, ReportStatus,
    ReportTarget,
};
use brewlog_core::types::DbId;
use brewlog_db::models::report::{Report, TargetLookup};
use brewlog_db::repositories::{PostRepo, ReportRepo};
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;
use crate::Brewlog;

/// A report as filed by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportInput {
    pub object_type: String,
    pub object_id: DbId,
    pub user_name: String,
    pub reason: String,
}

/// Result of [`Brewlog::apply_moderation_action`].
#[derive(Debug, Clone, Serialize)]
pub struct ModerationOutcome {
    /// The report after the action.
    pub report: Report,
    /// Whether a post was actually hidden.
    pub post_hidden: bool,
}

impl Brewlog {
    /// File a report against a post or review. Always starts open.
    pub async fn create_report(&self, input: ReportInput) -> ServiceResult<Report> {
        let target = ReportTarget::from_parts(input.object_type.trim(), input.object_id)?;
        let form = ReportForm {
            user_name: input.user_name.trim().to_string(),
            reason: input.reason.trim().to_string(),
        };
        validate_report_form(&form)?;

        let report = ReportRepo::create(&self.pool, target, &form).await?;
        tracing::info!(
            report_id = report.id,
            target = %target,
            user_name = %report.user_name,
            "Report created",
        );
        Ok(report)
    }

    /// Apply a staff action to a report.
    ///
    /// `Hide` sets `is_hidden` on a reported post that still exists and
    /// leaves the report open. `Close` closes the report whatever the
    /// target's state.
    pub async fn apply_moderation_action(
        &self,
        actor: &Actor,
        report_id: DbId,
        action: ModerationAction,
    ) -> ServiceResult<ModerationOutcome> {
        actor.require_staff()?;

        let mut tx = self.pool.begin().await?;
        let report = ReportRepo::lock(&mut tx, report_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Report",
                id: report_id,
            })?;
        let target = report.target()?;

        let (report, post_hidden) = match action {
            ModerationAction::Hide => {
                let hidden = match target {
                    ReportTarget::Post(post_id) => {
                        let hidden = PostRepo::set_hidden(&mut *tx, post_id, true).await?;
                        if !hidden {
                            tracing::warn!(report_id, post_id, "Reported post no longer exists");
                        }
                        hidden
                    }
                    ReportTarget::Review(_) => {
                        tracing::warn!(report_id, target = %target, "Hide does not apply to reviews");
                        false
                    }
                };
                (report, hidden)
            }
            ModerationAction::Close => {
                validate_transition(report.status()?, ReportStatus::Closed)?;
                let closed = ReportRepo::close(&mut *tx, report_id)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "Report",
                        id: report_id,
                    })?;
                (closed, false)
            }
        };

        tx.commit().await?;

        tracing::info!(
            report_id,
            action = action.as_str(),
            target = %target,
            post_hidden,
            actor = %actor.user_name,
            "Moderation action applied",
        );
        Ok(ModerationOutcome {
            report,
            post_hidden,
        })
    }

    /// Open reports for the moderation queue, newest first.
    pub async fn list_open_reports(&self, actor: &Actor) -> ServiceResult<Vec<Report>> {
        actor.require_staff()?;
        Ok(ReportRepo::list_open(&self.pool).await?)
    }

    /// Current state of a report's target, for display next to the report.
    pub async fn report_target(&self, actor: &Actor, report_id: DbId) -> ServiceResult<TargetLookup> {
        actor.require_staff()?;

        let report = ReportRepo::find_by_id(&self.pool, report_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Report",
                id: report_id,
            })?;
        let mut conn = self.pool.acquire().await?;
        Ok(ReportRepo::resolve_target(&mut conn, report.target()?).await?)
    }
}
