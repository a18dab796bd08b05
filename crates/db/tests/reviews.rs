//! Integration tests for reviews, photos and the stored rating aggregate.

use brewlog_db::models::beer::CreateBeer;
use brewlog_db::models::brewery::CreateBrewery;
use brewlog_db::models::review::ReviewFields;
use brewlog_db::repositories::{BeerRepo, BreweryRepo, ReviewPhotoRepo, ReviewRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_beer(pool: &PgPool, name: &str) -> i64 {
    let brewery = BreweryRepo::create(
        pool,
        &CreateBrewery {
            name: format!("{name} Brewing"),
            country: None,
        },
    )
    .await
    .unwrap();
    BeerRepo::create(
        pool,
        &CreateBeer {
            brewery_id: brewery.id,
            name: name.to_string(),
            style: "Pale Ale".to_string(),
            abv: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn fields(user_name: &str, axes: [i16; 4]) -> ReviewFields {
    ReviewFields {
        user_name: user_name.to_string(),
        brand: None,
        brewery_name: Some("Texto libre".to_string()),
        comment: "Buena".to_string(),
        aroma: axes[0],
        sabor: axes[1],
        cuerpo: axes[2],
        apariencia: axes[3],
    }
}

async fn stored_rating(pool: &PgPool, beer_id: i64) -> f64 {
    BeerRepo::find_by_id(pool, beer_id)
        .await
        .unwrap()
        .unwrap()
        .avg_rating
}

// ---------------------------------------------------------------------------
// Test: rating aggregate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_recompute_follows_create_update_delete(pool: PgPool) {
    let beer_id = seed_beer(&pool, "Torobayo").await;
    let mut tx = pool.begin().await.unwrap();

    let first = ReviewRepo::create(&mut *tx, beer_id, &fields("ana", [4, 4, 4, 4]))
        .await
        .unwrap();
    assert_eq!(ReviewRepo::recompute_beer_rating(&mut tx, beer_id).await.unwrap(), 4.0);

    let second = ReviewRepo::create(&mut *tx, beer_id, &fields("bruno", [3, 3, 3, 4]))
        .await
        .unwrap();
    // (4.0 + 3.25) / 2 = 3.625 -> 3.63
    assert_eq!(ReviewRepo::recompute_beer_rating(&mut tx, beer_id).await.unwrap(), 3.63);

    ReviewRepo::update(&mut *tx, first.id, &fields("ana", [5, 5, 5, 5]))
        .await
        .unwrap()
        .unwrap();
    // (5.0 + 3.25) / 2 = 4.125 -> 4.13
    assert_eq!(ReviewRepo::recompute_beer_rating(&mut tx, beer_id).await.unwrap(), 4.13);

    assert_eq!(
        ReviewRepo::delete(&mut *tx, second.id).await.unwrap(),
        Some(beer_id)
    );
    ReviewRepo::recompute_beer_rating(&mut tx, beer_id).await.unwrap();
    ReviewRepo::delete(&mut *tx, first.id).await.unwrap();
    assert_eq!(ReviewRepo::recompute_beer_rating(&mut tx, beer_id).await.unwrap(), 0.0);

    tx.commit().await.unwrap();
    assert_eq!(stored_rating(&pool, beer_id).await, 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recompute_missing_beer_is_row_not_found(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let err = ReviewRepo::recompute_beer_rating(&mut conn, 424242)
        .await
        .unwrap_err();
    assert!(matches!(err, sqlx::Error::RowNotFound));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_recomputes_see_each_other(pool: PgPool) {
    let beer_id = seed_beer(&pool, "Cusqueña").await;
    let mut tx_a = pool.begin().await.unwrap();
    let mut tx_b = pool.begin().await.unwrap();

    let (a, b) = tokio::join!(
        async {
            ReviewRepo::create(&mut *tx_a, beer_id, &fields("ana", [5, 5, 5, 5]))
                .await
                .unwrap();
            ReviewRepo::recompute_beer_rating(&mut tx_a, beer_id).await.unwrap();
            tx_a.commit().await
        },
        async {
            ReviewRepo::create(&mut *tx_b, beer_id, &fields("bruno", [1, 1, 1, 1]))
                .await
                .unwrap();
            ReviewRepo::recompute_beer_rating(&mut tx_b, beer_id).await.unwrap();
            tx_b.commit().await
        },
    );
    a.unwrap();
    b.unwrap();

    // Whichever transaction committed last saw both reviews.
    assert_eq!(stored_rating(&pool, beer_id).await, 3.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_for_beer_is_newest_first(pool: PgPool) {
    let beer_id = seed_beer(&pool, "Austral").await;
    let older = ReviewRepo::create(&pool, beer_id, &fields("ana", [3, 3, 3, 3]))
        .await
        .unwrap();
    let newer = ReviewRepo::create(&pool, beer_id, &fields("bruno", [4, 4, 4, 4]))
        .await
        .unwrap();

    let reviews = ReviewRepo::list_for_beer(&pool, beer_id).await.unwrap();
    let ids: Vec<i64> = reviews.iter().map(|r| r.id).collect();
    assert_eq!(ids, [newer.id, older.id]);
    assert_eq!(ReviewRepo::count_for_beer(&pool, beer_id).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_axis_out_of_range_rejected_by_schema(pool: PgPool) {
    let beer_id = seed_beer(&pool, "Baltica").await;
    let result = ReviewRepo::create(&pool, beer_id, &fields("ana", [0, 3, 3, 3])).await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Test: photos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_photos_listed_and_cascade_with_review(pool: PgPool) {
    let beer_id = seed_beer(&pool, "Escudo").await;
    let a = ReviewRepo::create(&pool, beer_id, &fields("ana", [4, 4, 4, 4]))
        .await
        .unwrap();
    let b = ReviewRepo::create(&pool, beer_id, &fields("bruno", [4, 4, 4, 4]))
        .await
        .unwrap();

    ReviewPhotoRepo::create(&pool, a.id, "reviews/a1.jpg").await.unwrap();
    ReviewPhotoRepo::create(&pool, a.id, "reviews/a2.jpg").await.unwrap();
    ReviewPhotoRepo::create(&pool, b.id, "reviews/b1.jpg").await.unwrap();

    assert_eq!(ReviewPhotoRepo::count_for_review(&pool, a.id).await.unwrap(), 2);
    let batch = ReviewPhotoRepo::list_for_reviews(&pool, &[a.id, b.id])
        .await
        .unwrap();
    assert_eq!(batch.len(), 3);
    assert!(ReviewPhotoRepo::list_for_reviews(&pool, &[]).await.unwrap().is_empty());

    ReviewRepo::delete(&pool, a.id).await.unwrap();
    assert!(ReviewPhotoRepo::list_for_review(&pool, a.id).await.unwrap().is_empty());
}
