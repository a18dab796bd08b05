//! The caller identity handed in by the external authentication layer.

use crate::error::CoreError;
use crate::types::DbId;

/// Who is performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_name: String,
    /// Opaque id in the external user store, when the caller is logged in.
    pub user_id: Option<DbId>,
    /// Staff may moderate and manage the catalog.
    pub is_staff: bool,
}

impl Actor {
    pub fn user(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            user_id: None,
            is_staff: false,
        }
    }

    pub fn staff(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            user_id: None,
            is_staff: true,
        }
    }

    pub fn with_user_id(mut self, user_id: DbId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Authors may modify their own content; staff may modify anything.
    pub fn can_modify(&self, author_name: &str) -> bool {
        self.is_staff || self.user_name == author_name
    }

    /// Reject unless the actor may modify content written by `author_name`.
    pub fn require_author_or_staff(&self, author_name: &str) -> Result<(), CoreError> {
        if self.can_modify(author_name) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Only the author or staff can modify this content".into(),
            ))
        }
    }

    pub fn require_staff(&self) -> Result<(), CoreError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Staff role required".into()))
        }
    }
}
