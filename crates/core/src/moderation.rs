//! Report targets, statuses and moderation actions.
//!
//! A report points at a post or review through a weak `(object_type,
//! object_id)` pair: the target may be deleted before or after the report is
//! filed. Reports move `open -> closed` and never back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::FieldErrors;

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

pub const OBJECT_TYPE_POST: &str = "post";
pub const OBJECT_TYPE_REVIEW: &str = "review";

/// All valid report object types.
pub const VALID_OBJECT_TYPES: &[&str] = &[OBJECT_TYPE_POST, OBJECT_TYPE_REVIEW];

/// The content a report is about. Holds only an id; existence is not implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "object_type", content = "object_id", rename_all = "snake_case")]
pub enum ReportTarget {
    Post(DbId),
    Review(DbId),
}

impl ReportTarget {
    /// Build a target from its stored parts.
    pub fn from_parts(object_type: &str, object_id: DbId) -> Result<Self, CoreError> {
        if object_id < 1 {
            return Err(CoreError::Validation(format!(
                "Report object_id must be a positive integer (got {object_id})"
            )));
        }
        match object_type {
            OBJECT_TYPE_POST => Ok(Self::Post(object_id)),
            OBJECT_TYPE_REVIEW => Ok(Self::Review(object_id)),
            other => Err(CoreError::Validation(format!(
                "Invalid report object type '{other}'. Must be one of: {}",
                VALID_OBJECT_TYPES.join(", ")
            ))),
        }
    }

    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Post(_) => OBJECT_TYPE_POST,
            Self::Review(_) => OBJECT_TYPE_REVIEW,
        }
    }

    pub fn object_id(&self) -> DbId {
        match self {
            Self::Post(id) | Self::Review(id) => *id,
        }
    }
}

impl fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type(), self.object_id())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_OPEN: &str = "open";
pub const STATUS_CLOSED: &str = "closed";

/// All valid report statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_CLOSED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    Closed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => STATUS_OPEN,
            Self::Closed => STATUS_CLOSED,
        }
    }
}

impl FromStr for ReportStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_OPEN => Ok(Self::Open),
            STATUS_CLOSED => Ok(Self::Closed),
            other => Err(CoreError::Validation(format!(
                "Invalid report status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

/// Whether a report may move from `from` to `to`.
///
/// Closing a closed report is allowed and changes nothing.
pub fn can_transition(from: ReportStatus, to: ReportStatus) -> bool {
    matches!(
        (from, to),
        (ReportStatus::Open, ReportStatus::Closed) | (ReportStatus::Closed, ReportStatus::Closed)
    )
}

/// Validate a status transition.
pub fn validate_transition(from: ReportStatus, to: ReportStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition report from '{}' to '{}'",
            from.as_str(),
            to.as_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

pub const ACTION_HIDE: &str = "hide";
pub const ACTION_CLOSE: &str = "close";

/// All valid moderation actions.
pub const VALID_ACTIONS: &[&str] = &[ACTION_HIDE, ACTION_CLOSE];

/// What a moderator does with a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    /// Hide the reported post. Does not change the report's status.
    Hide,
    /// Close the report.
    Close,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hide => ACTION_HIDE,
            Self::Close => ACTION_CLOSE,
        }
    }

    /// Whether this action has any effect on content of the given target kind.
    pub fn applies_to(&self, target: &ReportTarget) -> bool {
        match self {
            Self::Hide => matches!(target, ReportTarget::Post(_)),
            Self::Close => true,
        }
    }
}

impl FromStr for ModerationAction {
    type Err = CoreError;

    /// Unknown actions are rejected rather than ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ACTION_HIDE => Ok(Self::Hide),
            ACTION_CLOSE => Ok(Self::Close),
            other => Err(CoreError::Validation(format!(
                "Unknown moderation action '{other}'. Must be one of: {}",
                VALID_ACTIONS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Report form
// ---------------------------------------------------------------------------

/// Maximum length of a report reason (characters).
pub const MAX_REASON_LENGTH: u64 = 200;

pub const MSG_REASON_REQUIRED: &str = "El motivo es requerido.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportForm {
    #[validate(length(min = 1, max = 100, message = "El nombre de usuario es requerido (máximo 100 caracteres)."))]
    pub user_name: String,
    #[validate(length(max = MAX_REASON_LENGTH, message = "El motivo admite hasta 200 caracteres."))]
    pub reason: String,
}

/// Validate the free-text part of a report.
pub fn validate_report_form(form: &ReportForm) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    if let Err(e) = form.validate() {
        errors.extend_from_validator(&e);
    }
    if form.reason.trim().is_empty() {
        errors.add("reason", MSG_REASON_REQUIRED);
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn target_round_trips_through_parts() {
        let target = ReportTarget::from_parts("post", 9999).unwrap();
        assert_eq!(target, ReportTarget::Post(9999));
        assert_eq!(target.object_type(), "post");
        assert_eq!(target.object_id(), 9999);
        assert_eq!(target.to_string(), "post:9999");
    }

    #[test]
    fn target_rejects_unknown_types_and_bad_ids() {
        assert!(ReportTarget::from_parts("thread", 1).is_err());
        assert!(ReportTarget::from_parts("post", 0).is_err());
        assert!(ReportTarget::from_parts("review", -3).is_err());
    }

    #[test]
    fn only_open_to_closed() {
        assert!(can_transition(ReportStatus::Open, ReportStatus::Closed));
        assert!(can_transition(ReportStatus::Closed, ReportStatus::Closed));
        assert!(!can_transition(ReportStatus::Closed, ReportStatus::Open));
        assert!(validate_transition(ReportStatus::Closed, ReportStatus::Open).is_err());
    }

    #[test]
    fn status_parses_known_values() {
        assert_eq!("open".parse::<ReportStatus>().unwrap(), ReportStatus::Open);
        assert_eq!(
            "closed".parse::<ReportStatus>().unwrap(),
            ReportStatus::Closed
        );
        assert!("archived".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert_eq!(
            "hide".parse::<ModerationAction>().unwrap(),
            ModerationAction::Hide
        );
        let err = "delete".parse::<ModerationAction>().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => assert!(msg.contains("delete")));
    }

    #[test]
    fn hide_only_applies_to_posts() {
        assert!(ModerationAction::Hide.applies_to(&ReportTarget::Post(1)));
        assert!(!ModerationAction::Hide.applies_to(&ReportTarget::Review(1)));
        assert!(ModerationAction::Close.applies_to(&ReportTarget::Review(1)));
    }

    #[test]
    fn report_form_requires_reason() {
        let form = ReportForm {
            user_name: "ana".into(),
            reason: "   ".into(),
        };
        let err = validate_report_form(&form).unwrap_err();
        assert_matches!(err, CoreError::InvalidInput(errors) => {
            assert_eq!(errors.get("reason").unwrap(), [MSG_REASON_REQUIRED]);
        });
    }

    #[test]
    fn report_form_limits_reason_length() {
        let form = ReportForm {
            user_name: "ana".into(),
            reason: "x".repeat(MAX_REASON_LENGTH as usize + 1),
        };
        assert!(validate_report_form(&form).is_err());
    }
}
