//! Catalog browsing and staff catalog management.

use brewlog_core::actor::Actor;
use brewlog_core::error::CoreError;
use brewlog_core::resolution::{MAX_BEER_NAME_CHARS, MAX_BREWERY_NAME_CHARS, MAX_STYLE_CHARS};
use brewlog_core::types::DbId;
use brewlog_core::validation::{check_max_chars, non_blank, FieldErrors};
use brewlog_db::models::beer::{Beer, BeerFilter, CreateBeer, RatedBeer};
use brewlog_db::models::brewery::{Brewery, CreateBrewery};
use brewlog_db::models::metrics::CommunityTotals;
use brewlog_db::models::review::ReviewWithPhotos;
use brewlog_db::repositories::{BeerRepo, BreweryRepo, MetricsRepo, ThreadRepo};
use serde::Serialize;

use crate::error::{conflict_on_duplicate, ServiceResult};
use crate::{Brewlog, TopRatedConfig};

const MAX_COUNTRY_CHARS: usize = 80;

/// Everything shown on a beer's page.
#[derive(Debug, Clone, Serialize)]
pub struct BeerDetail {
    pub beer: Beer,
    pub brewery: Brewery,
    /// Newest first, with photos.
    pub reviews: Vec<ReviewWithPhotos>,
    pub threads_count: i64,
}

/// Staff dashboard figures.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityMetrics {
    pub totals: CommunityTotals,
    pub top_rated: Vec<RatedBeer>,
}

impl Brewlog {
    /// Beers matching `filter`, ordered by name.
    pub async fn search_beers(&self, filter: &BeerFilter) -> ServiceResult<Vec<Beer>> {
        Ok(BeerRepo::search(&self.pool, filter).await?)
    }

    pub async fn list_breweries(&self) -> ServiceResult<Vec<Brewery>> {
        Ok(BreweryRepo::list(&self.pool).await?)
    }

    /// Distinct styles in the catalog, for the search form.
    pub async fn list_styles(&self) -> ServiceResult<Vec<String>> {
        Ok(BeerRepo::list_styles(&self.pool).await?)
    }

    pub async fn beer_detail(&self, beer_id: DbId) -> ServiceResult<BeerDetail> {
        let beer = BeerRepo::find_by_id(&self.pool, beer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Beer",
                id: beer_id,
            })?;
        let brewery = BreweryRepo::find_by_id(&self.pool, beer.brewery_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Brewery",
                id: beer.brewery_id,
            })?;
        let reviews = self.reviews_with_photos(beer_id).await?;
        let threads_count = ThreadRepo::count_for_beer(&self.pool, beer_id).await?;

        Ok(BeerDetail {
            beer,
            brewery,
            reviews,
            threads_count,
        })
    }

    pub async fn create_brewery(
        &self,
        actor: &Actor,
        input: CreateBrewery,
    ) -> ServiceResult<Brewery> {
        actor.require_staff()?;

        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", &input.name, MAX_BREWERY_NAME_CHARS);
        if let Some(country) = &input.country {
            check_max_chars(&mut errors, "country", country, MAX_COUNTRY_CHARS);
        }
        errors.into_result()?;

        let input = CreateBrewery {
            name,
            country: non_blank(input.country.as_deref()),
        };
        let brewery = BreweryRepo::create(&self.pool, &input)
            .await
            .map_err(|e| conflict_on_duplicate(e, format!("Brewery '{}' already exists", input.name)))?;

        tracing::info!(brewery_id = brewery.id, name = %brewery.name, "Brewery created");
        Ok(brewery)
    }

    pub async fn create_beer(&self, actor: &Actor, input: CreateBeer) -> ServiceResult<Beer> {
        actor.require_staff()?;

        let mut errors = FieldErrors::new();
        let name = required_text(&mut errors, "name", &input.name, MAX_BEER_NAME_CHARS);
        let style = required_text(&mut errors, "style", &input.style, MAX_STYLE_CHARS);
        if input.abv.is_some_and(|abv| !(0.0..100.0).contains(&abv)) {
            errors.add("abv", "El grado alcohólico debe estar entre 0 y 100.");
        }
        errors.into_result()?;

        BreweryRepo::find_by_id(&self.pool, input.brewery_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Brewery",
                id: input.brewery_id,
            })?;

        let input = CreateBeer {
            name,
            style,
            ..input
        };
        let beer = BeerRepo::create(&self.pool, &input)
            .await
            .map_err(|e| conflict_on_duplicate(e, format!("Beer '{}' already exists", input.name)))?;

        tracing::info!(beer_id = beer.id, brewery_id = beer.brewery_id, name = %beer.name, "Beer created");
        Ok(beer)
    }

    /// Delete a beer with its reviews and threads.
    pub async fn delete_beer(&self, actor: &Actor, beer_id: DbId) -> ServiceResult<()> {
        actor.require_staff()?;
        if !BeerRepo::delete(&self.pool, beer_id).await? {
            return Err(CoreError::NotFound {
                entity: "Beer",
                id: beer_id,
            }
            .into());
        }
        tracing::info!(beer_id, actor = %actor.user_name, "Beer deleted");
        Ok(())
    }

    /// Delete a brewery with all of its beers.
    pub async fn delete_brewery(&self, actor: &Actor, brewery_id: DbId) -> ServiceResult<()> {
        actor.require_staff()?;
        if !BreweryRepo::delete(&self.pool, brewery_id).await? {
            return Err(CoreError::NotFound {
                entity: "Brewery",
                id: brewery_id,
            }
            .into());
        }
        tracing::info!(brewery_id, actor = %actor.user_name, "Brewery deleted");
        Ok(())
    }

    /// Totals and the best-rated beers.
    ///
    /// Beers with at least `min_reviews` reviews are preferred; when fewer
    /// than `limit` of them qualify the listing falls back to all beers.
    pub async fn community_metrics(&self, actor: &Actor) -> ServiceResult<CommunityMetrics> {
        actor.require_staff()?;

        let totals = MetricsRepo::totals(&self.pool).await?;
        let TopRatedConfig { min_reviews, limit } = self.top_rated;

        let mut top_rated = BeerRepo::top_rated(&self.pool, min_reviews, limit).await?;
        if (top_rated.len() as i64) < limit {
            top_rated = BeerRepo::top_rated(&self.pool, 0, limit).await?;
        }

        Ok(CommunityMetrics { totals, top_rated })
    }
}

/// Trimmed `value`, recording an error when blank or longer than `max_chars`.
fn required_text(errors: &mut FieldErrors, field: &str, value: &str, max_chars: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "Este campo es requerido.");
    } else {
        check_max_chars(errors, field, value, max_chars);
    }
    value.to_string()
}
