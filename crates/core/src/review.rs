//! Review form rules.
//!
//! Validation happens at the boundary, before anything is written: ratings in
//! `1..=5`, a non-empty comment of at most [`MAX_COMMENT_WORDS`] words, and no
//! more than [`MAX_PHOTOS_PER_REVIEW`] photos.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::rating::{AxisScores, MAX_AXIS_SCORE, MIN_AXIS_SCORE};
use crate::validation::{non_blank, word_count, FieldErrors, MSG_USER_NAME_REQUIRED};

/// Maximum number of words in a review comment.
pub const MAX_COMMENT_WORDS: usize = 300;

/// Maximum number of photos attached to one review.
pub const MAX_PHOTOS_PER_REVIEW: usize = 3;

pub const MSG_COMMENT_REQUIRED: &str = "El comentario es requerido.";
pub const MSG_RATING_RANGE: &str = "La calificación debe estar entre 1 y 5.";

/// Message for a comment over the word limit, with the offending count.
pub fn msg_comment_too_long(words: usize) -> String {
    format!("El comentario no puede exceder {MAX_COMMENT_WORDS} palabras (actual: {words}).")
}

/// Message for too many photos, with the offending count.
pub fn msg_too_many_photos(count: usize) -> String {
    format!("Máximo {MAX_PHOTOS_PER_REVIEW} fotos por reseña (recibidas: {count}).")
}

/// User-submitted review content, excluding beer identification and photos.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(length(max = 100, message = "El nombre de usuario admite hasta 100 caracteres."))]
    pub user_name: String,
    #[validate(length(max = 120, message = "La marca admite hasta 120 caracteres."))]
    pub brand: Option<String>,
    /// Free-text snapshot; independent of the linked beer's brewery.
    #[validate(length(max = 120, message = "La cervecería admite hasta 120 caracteres."))]
    pub brewery_name: Option<String>,
    pub comment: String,
    pub aroma: i16,
    pub sabor: i16,
    pub cuerpo: i16,
    pub apariencia: i16,
}

impl ReviewForm {
    pub fn scores(&self) -> AxisScores {
        AxisScores::new(self.aroma, self.sabor, self.cuerpo, self.apariencia)
    }

    /// Trimmed copy with blank optional fields mapped to `None`.
    pub fn cleaned(&self) -> Self {
        Self {
            user_name: self.user_name.trim().to_string(),
            brand: non_blank(self.brand.as_deref()),
            brewery_name: non_blank(self.brewery_name.as_deref()),
            comment: self.comment.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Validate a review form and the number of attached photos.
///
/// Returns every problem found as [`CoreError::InvalidInput`].
pub fn validate_review_form(form: &ReviewForm, photo_count: usize) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();

    if let Err(e) = form.validate() {
        errors.extend_from_validator(&e);
    }

    if form.user_name.trim().is_empty() {
        errors.add("user_name", MSG_USER_NAME_REQUIRED);
    }

    for (field, score) in form.scores().axes() {
        if !(MIN_AXIS_SCORE..=MAX_AXIS_SCORE).contains(&score) {
            errors.add(field, MSG_RATING_RANGE);
        }
    }

    let words = word_count(&form.comment);
    if words == 0 {
        errors.add("comment", MSG_COMMENT_REQUIRED);
    } else if words > MAX_COMMENT_WORDS {
        errors.add("comment", msg_comment_too_long(words));
    }

    validate_photo_count(photo_count, &mut errors);

    errors.into_result()
}

/// Record an error when `count` exceeds [`MAX_PHOTOS_PER_REVIEW`].
pub fn validate_photo_count(count: usize, errors: &mut FieldErrors) {
    if count > MAX_PHOTOS_PER_REVIEW {
        errors.add("photos", msg_too_many_photos(count));
    }
}
