//! Integration tests for breweries, beers and free-text find-or-create.

use assert_matches::assert_matches;
use brewlog_core::resolution::{NewBeer, Resolution};
use brewlog_db::is_unique_violation;
use brewlog_db::models::beer::{BeerFilter, CreateBeer};
use brewlog_db::models::brewery::CreateBrewery;
use brewlog_db::repositories::{BeerRepo, BreweryRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_brewery(name: &str) -> CreateBrewery {
    CreateBrewery {
        name: name.to_string(),
        country: Some("Chile".to_string()),
    }
}

fn new_beer(brewery_id: i64, name: &str, style: &str) -> CreateBeer {
    CreateBeer {
        brewery_id,
        name: name.to_string(),
        style: style.to_string(),
        abv: Some(5.2),
    }
}

fn by_name(name: &str, style: &str, brewery_name: &str) -> NewBeer {
    NewBeer {
        name: name.to_string(),
        style: style.to_string(),
        brewery_name: brewery_name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: CRUD and constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_beer_starts_unrated(pool: PgPool) {
    let brewery = BreweryRepo::create(&pool, &new_brewery("Kross")).await.unwrap();
    let beer = BeerRepo::create(&pool, &new_beer(brewery.id, "Kross Golden", "Golden Ale"))
        .await
        .unwrap();

    assert_eq!(beer.brewery_id, brewery.id);
    assert_eq!(beer.avg_rating, 0.0);
    assert_eq!(beer.abv, Some(5.2));

    let found = BeerRepo::find_by_id(&pool, beer.id).await.unwrap().unwrap();
    assert_eq!(found, beer);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_brewery_name_rejected(pool: PgPool) {
    BreweryRepo::create(&pool, &new_brewery("Kunstmann")).await.unwrap();
    let err = BreweryRepo::create(&pool, &new_brewery("Kunstmann"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_beer_names_unique_ignoring_case(pool: PgPool) {
    let brewery = BreweryRepo::create(&pool, &new_brewery("Kross")).await.unwrap();
    BeerRepo::create(&pool, &new_beer(brewery.id, "Maibock", "Bock"))
        .await
        .unwrap();
    let err = BeerRepo::create(&pool, &new_beer(brewery.id, "MAIBOCK", "Bock"))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_brewery_cascades_to_beers(pool: PgPool) {
    let brewery = BreweryRepo::create(&pool, &new_brewery("Austral")).await.unwrap();
    let beer = BeerRepo::create(&pool, &new_beer(brewery.id, "Calafate", "Ale"))
        .await
        .unwrap();

    assert!(BreweryRepo::delete(&pool, brewery.id).await.unwrap());
    assert!(BeerRepo::find_by_id(&pool, beer.id).await.unwrap().is_none());
    assert!(!BreweryRepo::delete(&pool, brewery.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: find-or-create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_find_or_create_brewery_is_exact_match(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let first = BreweryRepo::find_or_create(&mut conn, "Unknown").await.unwrap();
    assert!(first.is_created());
    let again = BreweryRepo::find_or_create(&mut conn, "Unknown").await.unwrap();
    assert_matches!(again, Resolution::Found(b) => assert_eq!(b.id, first.get().id));

    let other_case = BreweryRepo::find_or_create(&mut conn, "unknown").await.unwrap();
    assert!(other_case.is_created());
    assert_ne!(other_case.get().id, first.get().id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_or_create_beer_creates_with_brewery(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let created = BeerRepo::find_or_create_by_name(&mut conn, &by_name("Golden Ale", "Unknown", "Unknown"))
        .await
        .unwrap();
    let beer = assert_matches!(created, Resolution::Created(beer) => beer);
    assert_eq!(beer.style, "Unknown");
    assert_eq!(beer.avg_rating, 0.0);

    let brewery = BreweryRepo::find_by_id(&pool, beer.brewery_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(brewery.name, "Unknown");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_or_create_beer_matches_case_insensitively(pool: PgPool) {
    let brewery = BreweryRepo::create(&pool, &new_brewery("Kross")).await.unwrap();
    let existing = BeerRepo::create(&pool, &new_beer(brewery.id, "Golden Ale", "Golden Ale"))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let resolved = BeerRepo::find_or_create_by_name(&mut conn, &by_name("golden ALE", "Stout", "Otra"))
        .await
        .unwrap();

    // Existing beer returned untouched; style and brewery are ignored.
    assert_matches!(resolved, Resolution::Found(beer) => {
        assert_eq!(beer.id, existing.id);
        assert_eq!(beer.style, "Golden Ale");
    });
    assert!(BreweryRepo::find_by_name(&pool, "Otra").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_find_or_create_converges(pool: PgPool) {
    let mut tx_a = pool.begin().await.unwrap();
    let mut tx_b = pool.begin().await.unwrap();
    let target = by_name("Imperial Stout", "Stout", "Unknown");

    let (a, b) = tokio::join!(
        async {
            let r = BeerRepo::find_or_create_by_name(&mut tx_a, &target).await;
            tx_a.commit().await.unwrap();
            r
        },
        async {
            let r = BeerRepo::find_or_create_by_name(&mut tx_b, &target).await;
            tx_b.commit().await.unwrap();
            r
        },
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.get().id, b.get().id);
    assert_eq!(
        [a.is_created(), b.is_created()].iter().filter(|c| **c).count(),
        1,
        "exactly one caller creates the beer"
    );

    let beers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM beers")
        .fetch_one(&pool)
        .await
        .unwrap();
    let breweries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM breweries")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((beers, breweries), (1, 1));
}

// ---------------------------------------------------------------------------
// Test: search and listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_combines_filters(pool: PgPool) {
    let kross = BreweryRepo::create(&pool, &new_brewery("Kross")).await.unwrap();
    let austral = BreweryRepo::create(&pool, &new_brewery("Austral")).await.unwrap();
    let golden = BeerRepo::create(&pool, &new_beer(kross.id, "Kross Golden", "Golden Ale"))
        .await
        .unwrap();
    let stout = BeerRepo::create(&pool, &new_beer(kross.id, "Kross Stout", "Stout"))
        .await
        .unwrap();
    BeerRepo::create(&pool, &new_beer(austral.id, "Austral Lager", "Lager"))
        .await
        .unwrap();
    BeerRepo::set_avg_rating(&pool, golden.id, 4.25).await.unwrap();
    BeerRepo::set_avg_rating(&pool, stout.id, 3.5).await.unwrap();

    let all = BeerRepo::search(&pool, &BeerFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].name, "Austral Lager");

    let kross_only = BeerRepo::search(
        &pool,
        &BeerFilter {
            q: Some("kross".into()),
            ..BeerFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(kross_only.len(), 2);

    let rated = BeerRepo::search(
        &pool,
        &BeerFilter {
            brewery_id: Some(kross.id),
            min_rating: Some(4.0),
            ..BeerFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(rated.len(), 1);
    assert_eq!(rated[0].id, golden.id);

    let wildcard = BeerRepo::search(
        &pool,
        &BeerFilter {
            q: Some("%".into()),
            ..BeerFilter::default()
        },
    )
    .await
    .unwrap();
    assert!(wildcard.is_empty());

    let styles = BeerRepo::list_styles(&pool).await.unwrap();
    assert_eq!(styles, ["Golden Ale", "Lager", "Stout"]);
}
