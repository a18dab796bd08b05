//! Field-keyed validation errors shared by every form in the core.
//!
//! Forms are validated in two passes: declarative rules via
//! [`validator::Validate`] and hand-written checks that `validator` cannot
//! express (word counts, trimmed-blank detection). Both passes feed the same
//! [`FieldErrors`] so callers get every problem at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::ValidationErrors;

use crate::error::CoreError;

/// Key used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Shared by every form that carries an author name.
pub const MSG_USER_NAME_REQUIRED: &str = "El nombre de usuario es requerido.";

/// Ordered collection of validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection holding a single non-field message.
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Append every message from `other`, keeping existing ones first.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Merge the output of a `validator` pass.
    ///
    /// Rules without an explicit `message` fall back to their code.
    pub fn extend_from_validator(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                self.add(&field.to_string(), message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when empty, otherwise [`CoreError::InvalidInput`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidInput(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True when `value` is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Message for text longer than `max_chars` characters.
pub fn msg_too_many_chars(max_chars: usize) -> String {
    format!("Máximo {max_chars} caracteres.")
}

/// Record an error under `field` when `value` is longer than `max_chars`
/// characters once trimmed.
pub fn check_max_chars(errors: &mut FieldErrors, field: &str, value: &str, max_chars: usize) {
    if value.trim().chars().count() > max_chars {
        errors.add(field, msg_too_many_chars(max_chars));
    }
}

/// Trim `value`, mapping blank strings to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("comment", "first");
        errors.add("comment", "second");
        errors.add("aroma", "third");

        assert_eq!(errors.get("comment").unwrap(), ["first", "second"]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["aroma", "comment"]);
        assert_eq!(
            errors.to_string(),
            "aroma: third; comment: first; comment: second"
        );
    }

    #[test]
    fn merge_appends_after_existing_messages() {
        let mut errors = FieldErrors::new();
        errors.add("comment", "first");
        let mut other = FieldErrors::non_field("beer");
        other.add("comment", "second");

        errors.merge(other);
        assert_eq!(errors.get("comment").unwrap(), ["first", "second"]);
        assert_eq!(errors.get(NON_FIELD_ERRORS).unwrap(), ["beer"]);
    }

    #[test]
    fn non_field_uses_reserved_key() {
        let errors = FieldErrors::non_field("nope");
        assert_eq!(errors.get(NON_FIELD_ERRORS).unwrap(), ["nope"]);
    }

    #[test]
    fn word_count_ignores_repeated_whitespace() {
        assert_eq!(word_count("  una   cerveza\nmuy\tbuena "), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn blank_helpers() {
        assert!(is_blank(None));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some(" a ")));
        assert_eq!(non_blank(Some("  IPA ")), Some("IPA".to_string()));
        assert_eq!(non_blank(Some(" ")), None);
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        check_max_chars(&mut errors, "name", " ñandú ", 6);
        assert!(errors.is_empty());

        check_max_chars(&mut errors, "name", "cervezas", 6);
        assert_eq!(errors.get("name").unwrap(), [msg_too_many_chars(6)]);
    }

    #[test]
    fn serializes_as_plain_map() {
        let errors = FieldErrors::non_field("x");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"__all__":["x"]}"#);
    }
}
