//! Review write path.
//!
//! Every create, update and delete recomputes the beer's `avg_rating` in the
//! same transaction as the mutation, so the stored aggregate always matches
//! the committed review set.

use std::collections::HashMap;

use brewlog_core::actor::Actor;
use brewlog_core::error::CoreError;
use brewlog_core::resolution::{plan_resolution, BeerReference, Resolution};
use brewlog_core::review::{validate_photo_count, validate_review_form, ReviewForm};
use brewlog_core::types::DbId;
use brewlog_core::validation::{is_blank, FieldErrors};
use brewlog_db::models::beer::Beer;
use brewlog_db::models::review::{Review, ReviewFields, ReviewPhoto, ReviewWithPhotos};
use brewlog_db::repositories::{BeerRepo, ReviewPhotoRepo, ReviewRepo};
use serde::Serialize;

use crate::error::{collect_invalid, ServiceResult};
use crate::resolver::execute_plan;
use crate::Brewlog;

const MSG_BLANK_IMAGE_REF: &str = "Referencia de imagen vacía.";

/// A new review as submitted from a beer page or the free-text form.
#[derive(Debug, Clone)]
pub struct SubmitReview {
    pub reference: BeerReference,
    pub form: ReviewForm,
    /// Storage keys of already uploaded images.
    pub photos: Vec<String>,
}

/// Result of [`Brewlog::submit_review`].
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSubmission {
    /// The reviewed beer, and whether this submission created it.
    pub beer: Resolution<Beer>,
    pub review: Review,
    pub photos: Vec<ReviewPhoto>,
}

impl Brewlog {
    /// Validate, resolve the beer, store the review with its photos and
    /// refresh the beer's rating, all in one transaction.
    pub async fn submit_review(&self, input: SubmitReview) -> ServiceResult<ReviewSubmission> {
        let form = input.form.cleaned();

        let mut errors = FieldErrors::new();
        collect_invalid(validate_review_form(&form, input.photos.len()), &mut errors)?;
        if input.photos.iter().any(|r| is_blank(Some(r.as_str()))) {
            errors.add("photos", MSG_BLANK_IMAGE_REF);
        }
        let plan = match plan_resolution(&input.reference, &self.sentinels) {
            Ok(plan) => plan,
            Err(e) => {
                collect_invalid(Err(e), &mut errors)?;
                return Err(CoreError::InvalidInput(errors).into());
            }
        };
        errors.into_result()?;

        let mut tx = self.pool.begin().await?;

        let beer = execute_plan(&mut tx, plan).await?;
        let beer_id = beer.get().id;

        let review = ReviewRepo::create(&mut *tx, beer_id, &ReviewFields::from(&form)).await?;
        let mut photos = Vec::with_capacity(input.photos.len());
        for image_ref in &input.photos {
            photos.push(ReviewPhotoRepo::create(&mut *tx, review.id, image_ref.trim()).await?);
        }
        let avg_rating = ReviewRepo::recompute_beer_rating(&mut tx, beer_id).await?;

        tx.commit().await?;

        tracing::info!(
            review_id = review.id,
            beer_id,
            beer_created = beer.is_created(),
            photos = photos.len(),
            avg_rating,
            "Review submitted",
        );

        // Reflect the recomputed aggregate in the returned beer.
        let beer = beer.map(|b| Beer { avg_rating, ..b });
        Ok(ReviewSubmission {
            beer,
            review,
            photos,
        })
    }

    /// Replace a review's content and ratings. The author name and the
    /// reviewed beer stay as they are.
    pub async fn update_review(
        &self,
        actor: &Actor,
        review_id: DbId,
        form: ReviewForm,
    ) -> ServiceResult<Review> {
        let form = form.cleaned();
        let mut tx = self.pool.begin().await?;

        let existing = ReviewRepo::lock(&mut tx, review_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;
        actor.require_author_or_staff(&existing.user_name)?;

        let form = ReviewForm {
            user_name: existing.user_name.clone(),
            ..form
        };
        validate_review_form(&form, 0)?;

        let review = ReviewRepo::update(&mut *tx, review_id, &ReviewFields::from(&form))
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;
        let avg_rating = ReviewRepo::recompute_beer_rating(&mut tx, review.beer_id).await?;

        tx.commit().await?;

        tracing::info!(
            review_id,
            beer_id = review.beer_id,
            actor = %actor.user_name,
            avg_rating,
            "Review updated",
        );
        Ok(review)
    }

    /// Delete a review and its photos, then refresh the beer's rating.
    pub async fn delete_review(&self, actor: &Actor, review_id: DbId) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let existing = ReviewRepo::lock(&mut tx, review_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;
        actor.require_author_or_staff(&existing.user_name)?;

        ReviewRepo::delete(&mut *tx, review_id).await?;
        let avg_rating = ReviewRepo::recompute_beer_rating(&mut tx, existing.beer_id).await?;

        tx.commit().await?;

        tracing::info!(
            review_id,
            beer_id = existing.beer_id,
            actor = %actor.user_name,
            avg_rating,
            "Review deleted",
        );
        Ok(())
    }

    /// Attach more photos to a review, keeping the per-review cap.
    ///
    /// The review row stays locked while counting, so concurrent uploads
    /// cannot push a review past the cap together.
    pub async fn add_review_photos(
        &self,
        actor: &Actor,
        review_id: DbId,
        image_refs: Vec<String>,
    ) -> ServiceResult<Vec<ReviewPhoto>> {
        let mut tx = self.pool.begin().await?;

        let review = ReviewRepo::lock(&mut tx, review_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Review",
                id: review_id,
            })?;
        actor.require_author_or_staff(&review.user_name)?;

        let stored = ReviewPhotoRepo::count_for_review(&mut *tx, review_id).await?;
        let mut errors = FieldErrors::new();
        validate_photo_count(stored as usize + image_refs.len(), &mut errors);
        if image_refs.iter().any(|r| is_blank(Some(r.as_str()))) {
            errors.add("photos", MSG_BLANK_IMAGE_REF);
        }
        errors.into_result()?;

        let mut photos = Vec::with_capacity(image_refs.len());
        for image_ref in &image_refs {
            photos.push(ReviewPhotoRepo::create(&mut *tx, review_id, image_ref.trim()).await?);
        }

        tx.commit().await?;

        tracing::info!(review_id, added = photos.len(), "Review photos added");
        Ok(photos)
    }

    /// A beer's reviews with their photos, newest first.
    pub async fn list_reviews_for_beer(&self, beer_id: DbId) -> ServiceResult<Vec<ReviewWithPhotos>> {
        BeerRepo::find_by_id(&self.pool, beer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Beer",
                id: beer_id,
            })?;
        self.reviews_with_photos(beer_id).await
    }

    pub(crate) async fn reviews_with_photos(
        &self,
        beer_id: DbId,
    ) -> ServiceResult<Vec<ReviewWithPhotos>> {
        let reviews = ReviewRepo::list_for_beer(&self.pool, beer_id).await?;
        let ids: Vec<DbId> = reviews.iter().map(|r| r.id).collect();

        let mut by_review: HashMap<DbId, Vec<ReviewPhoto>> = HashMap::new();
        for photo in ReviewPhotoRepo::list_for_reviews(&self.pool, &ids).await? {
            by_review.entry(photo.review_id).or_default().push(photo);
        }

        Ok(reviews
            .into_iter()
            .map(|review| {
                let photos = by_review.remove(&review.id).unwrap_or_default();
                ReviewWithPhotos { review, photos }
            })
            .collect())
    }
}
