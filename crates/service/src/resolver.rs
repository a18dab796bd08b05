//! Resolves user-typed beer references to catalog rows.

use brewlog_core::error::CoreError;
use brewlog_core::resolution::{
    plan_resolution, BeerReference, Resolution, ResolutionPlan, Sentinels,
};
use brewlog_db::models::beer::Beer;
use brewlog_db::repositories::BeerRepo;
use sqlx::PgConnection;

use crate::error::ServiceResult;

/// Resolve `reference` to a beer, creating it (and its brewery) when the
/// typed name is new.
///
/// Must run inside the transaction that uses the result. Existing beers are
/// never modified.
pub async fn resolve_beer(
    conn: &mut PgConnection,
    reference: &BeerReference,
    sentinels: &Sentinels,
) -> ServiceResult<Resolution<Beer>> {
    let plan = plan_resolution(reference, sentinels)?;
    execute_plan(conn, plan).await
}

/// Carry out an already computed [`ResolutionPlan`].
pub async fn execute_plan(
    conn: &mut PgConnection,
    plan: ResolutionPlan,
) -> ServiceResult<Resolution<Beer>> {
    match plan {
        ResolutionPlan::Context(beer_id) => {
            let beer = BeerRepo::find_by_id(&mut *conn, beer_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Beer",
                    id: beer_id,
                })?;
            Ok(Resolution::Found(beer))
        }
        ResolutionPlan::ByName(new_beer) => {
            let resolution = BeerRepo::find_or_create_by_name(&mut *conn, &new_beer).await?;
            if let Resolution::Found(beer) = &resolution {
                tracing::debug!(beer_id = beer.id, name = %new_beer.name, "Beer resolved by name");
            }
            Ok(resolution)
        }
    }
}
