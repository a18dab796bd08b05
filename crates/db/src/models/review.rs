//! Review and review photo models and DTOs.

use brewlog_core::rating::AxisScores;
use brewlog_core::review::ReviewForm;
use brewlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub beer_id: DbId,
    pub user_name: String,
    pub brand: Option<String>,
    /// Brewery as typed by the reviewer, not necessarily the beer's brewery.
    pub brewery_name: Option<String>,
    pub comment: String,
    pub aroma: i16,
    pub sabor: i16,
    pub cuerpo: i16,
    pub apariencia: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Review {
    pub fn scores(&self) -> AxisScores {
        AxisScores::new(self.aroma, self.sabor, self.cuerpo, self.apariencia)
    }
}

/// A row from the `review_photos` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ReviewPhoto {
    pub id: DbId,
    pub review_id: DbId,
    /// Storage key returned by the upload store.
    pub image_ref: String,
    pub created_at: Timestamp,
}

/// Column values written on review insert or update.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewFields {
    pub user_name: String,
    pub brand: Option<String>,
    pub brewery_name: Option<String>,
    pub comment: String,
    pub aroma: i16,
    pub sabor: i16,
    pub cuerpo: i16,
    pub apariencia: i16,
}

impl From<&ReviewForm> for ReviewFields {
    fn from(form: &ReviewForm) -> Self {
        Self {
            user_name: form.user_name.clone(),
            brand: form.brand.clone(),
            brewery_name: form.brewery_name.clone(),
            comment: form.comment.clone(),
            aroma: form.aroma,
            sabor: form.sabor,
            cuerpo: form.cuerpo,
            apariencia: form.apariencia,
        }
    }
}

/// A review with its photos, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewWithPhotos {
    #[serde(flatten)]
    pub review: Review,
    pub photos: Vec<ReviewPhoto>,
}
