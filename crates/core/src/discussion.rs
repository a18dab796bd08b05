//! Thread and post form rules.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::validation::{FieldErrors, MSG_USER_NAME_REQUIRED};

pub const MSG_TITLE_REQUIRED: &str = "El título es requerido.";
pub const MSG_DESCRIPTION_REQUIRED: &str = "La descripción es requerida.";
pub const MSG_BODY_REQUIRED: &str = "El cuerpo no puede estar vacío.";

/// A new discussion thread; the description becomes its first post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ThreadForm {
    #[validate(length(max = 140, message = "El título admite hasta 140 caracteres."))]
    pub title: String,
    pub description: String,
    #[validate(length(max = 100, message = "El nombre de usuario admite hasta 100 caracteres."))]
    pub user_name: String,
}

/// A reply in an existing thread.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(max = 100, message = "El nombre de usuario admite hasta 100 caracteres."))]
    pub user_name: String,
    pub body: String,
}

pub fn validate_thread_form(form: &ThreadForm) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    if let Err(e) = form.validate() {
        errors.extend_from_validator(&e);
    }
    if form.title.trim().is_empty() {
        errors.add("title", MSG_TITLE_REQUIRED);
    }
    if form.description.trim().is_empty() {
        errors.add("description", MSG_DESCRIPTION_REQUIRED);
    }
    if form.user_name.trim().is_empty() {
        errors.add("user_name", MSG_USER_NAME_REQUIRED);
    }
    errors.into_result()
}

pub fn validate_post_form(form: &PostForm) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    if let Err(e) = form.validate() {
        errors.extend_from_validator(&e);
    }
    if form.body.trim().is_empty() {
        errors.add("body", MSG_BODY_REQUIRED);
    }
    if form.user_name.trim().is_empty() {
        errors.add("user_name", MSG_USER_NAME_REQUIRED);
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn thread(title: &str, description: &str) -> ThreadForm {
        ThreadForm {
            title: title.into(),
            description: description.into(),
            user_name: "ana".into(),
        }
    }

    #[test]
    fn valid_thread_passes() {
        assert!(validate_thread_form(&thread("¿Mejor fría?", "Opiniones")).is_ok());
    }

    #[test]
    fn blank_title_and_description_both_reported() {
        let err = validate_thread_form(&thread("  ", "")).unwrap_err();
        assert_matches!(err, CoreError::InvalidInput(errors) => {
            assert_eq!(errors.get("title").unwrap(), [MSG_TITLE_REQUIRED]);
            assert_eq!(errors.get("description").unwrap(), [MSG_DESCRIPTION_REQUIRED]);
        });
    }

    #[test]
    fn title_over_140_chars_rejected() {
        let err = validate_thread_form(&thread(&"t".repeat(141), "d")).unwrap_err();
        assert_matches!(err, CoreError::InvalidInput(errors) => {
            assert!(errors.get("title").is_some());
        });
    }

    #[test]
    fn empty_post_body_rejected() {
        let form = PostForm {
            user_name: "ana".into(),
            body: "\n\t".into(),
        };
        let err = validate_post_form(&form).unwrap_err();
        assert_matches!(err, CoreError::InvalidInput(errors) => {
            assert_eq!(errors.get("body").unwrap(), [MSG_BODY_REQUIRED]);
        });
    }
}
