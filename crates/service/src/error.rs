use brewlog_core::error::CoreError;
use brewlog_core::validation::FieldErrors;
use brewlog_db::ConfigError;

/// Error type returned by every service operation.
///
/// Wraps [`CoreError`] for domain errors and adds the infrastructure
/// failures the service layer can hit.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error from `brewlog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Stable machine-readable code for the calling layer.
    ///
    /// - `RowNotFound` maps to `NOT_FOUND`.
    /// - Unique violations on a `uq_` constraint map to `CONFLICT`.
    /// - Other infrastructure errors map to `INTERNAL_ERROR`.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Core(core) => match core {
                CoreError::NotFound { .. } => "NOT_FOUND",
                CoreError::Validation(_) => "VALIDATION_ERROR",
                CoreError::InvalidInput(_) => "INVALID_INPUT",
                CoreError::Conflict(_) => "CONFLICT",
                CoreError::Forbidden(_) => "FORBIDDEN",
                CoreError::Internal(_) => "INTERNAL_ERROR",
            },
            ServiceError::Database(sqlx::Error::RowNotFound) => "NOT_FOUND",
            ServiceError::Database(err) if self.is_unique_violation() => {
                tracing::debug!(error = %err, "Unique constraint violation");
                "CONFLICT"
            }
            ServiceError::Database(_) | ServiceError::Migration(_) | ServiceError::Config(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Whether this wraps a unique violation on a `uq_`-prefixed constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            ServiceError::Database(err) => {
                brewlog_db::is_unique_violation(err)
                    && matches!(
                        err,
                        sqlx::Error::Database(db_err)
                            if db_err.constraint().is_some_and(|c| c.starts_with("uq_"))
                    )
            }
            _ => false,
        }
    }
}

/// Map a unique violation to [`CoreError::Conflict`], passing other errors through.
pub(crate) fn conflict_on_duplicate(err: sqlx::Error, message: impl Into<String>) -> ServiceError {
    if brewlog_db::is_unique_violation(&err) {
        CoreError::Conflict(message.into()).into()
    } else {
        err.into()
    }
}

/// Fold an `InvalidInput` result into `errors`; other errors propagate.
pub(crate) fn collect_invalid(result: Result<(), CoreError>, errors: &mut FieldErrors) -> Result<(), CoreError> {
    match result {
        Ok(()) => Ok(()),
        Err(CoreError::InvalidInput(found)) => {
            errors.merge(found);
            Ok(())
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_codes() {
        let not_found: ServiceError = CoreError::NotFound { entity: "Beer", id: 1 }.into();
        assert_eq!(not_found.code(), "NOT_FOUND");

        let forbidden: ServiceError = CoreError::Forbidden("no".into()).into();
        assert_eq!(forbidden.code(), "FORBIDDEN");
    }

    #[test]
    fn row_not_found_is_not_found() {
        assert_eq!(ServiceError::from(sqlx::Error::RowNotFound).code(), "NOT_FOUND");
        assert!(!ServiceError::from(sqlx::Error::RowNotFound).is_unique_violation());
    }

    #[test]
    fn conflict_passthrough_for_other_errors() {
        let err = conflict_on_duplicate(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, ServiceError::Database(sqlx::Error::RowNotFound)));
    }
}
