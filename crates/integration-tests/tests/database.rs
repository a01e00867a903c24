//! `PostgreSQL` repository tests.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `BOOKHUB_DATABASE_URL`. Migrations are applied on connect.
//!
//! Run with: cargo test -p bookhub-integration-tests -- --ignored

use chrono::{Duration, Utc};

use bookhub_core::{Book, BookFlag, NewRental, RentalDuration};
use bookhub_integration_tests::{sample_catalog, test_pool, unique_book_id, unique_user};
use bookhub_storefront::catalog::CatalogSource;
use bookhub_storefront::db::{PgCatalog, PgRentalStore, RepositoryError};
use bookhub_storefront::rentals::RentalStore;

/// A sample book under a fresh id so runs do not collide.
fn fresh_book(title: &str) -> Book {
    let mut book = sample_catalog()
        .books()
        .first()
        .cloned()
        .expect("Sample catalog should not be empty");
    book.id = unique_book_id();
    book.title = title.to_owned();
    book
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_upsert_and_read_back() {
    let catalog = PgCatalog::new(test_pool().await);
    let mut book = fresh_book("Integration Upsert");

    let written = catalog.upsert_many(std::slice::from_ref(&book)).await.expect("upsert");
    assert_eq!(written, 1);

    let stored = catalog.get_by_id(&book.id).await.expect("get").expect("present");
    assert_eq!(stored, book);

    book.stock_quantity = 3;
    catalog.upsert_many(std::slice::from_ref(&book)).await.expect("update");
    let stored = catalog.get_by_id(&book.id).await.expect("get").expect("present");
    assert_eq!(stored.stock_quantity, 3);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_search_escapes_wildcards() {
    let catalog = PgCatalog::new(test_pool().await);
    let book = fresh_book("Discount 100%_off Special");
    catalog.upsert_many(std::slice::from_ref(&book)).await.expect("upsert");

    let hits = catalog.search("100%_off").await.expect("search");
    assert!(hits.iter().any(|b| b.id == book.id));

    let hits = catalog.search("100%%_of").await.expect("search");
    assert!(hits.iter().all(|b| b.id != book.id));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_seeded_sample_catalog() {
    let catalog = PgCatalog::new(test_pool().await);
    catalog
        .upsert_many(sample_catalog().books())
        .await
        .expect("seed");

    assert!(catalog.count().await.expect("count") >= 12);
    let new_arrivals = catalog.list_flagged(BookFlag::NewArrival).await.expect("list");
    assert!(new_arrivals.iter().all(|b| b.is_new_arrival));
}

// ============================================================================
// Rentals
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_rental_insert_and_lookup() {
    let pool = test_pool().await;
    let catalog = PgCatalog::new(pool.clone());
    let store = PgRentalStore::new(pool);

    let book = fresh_book("Integration Rental");
    catalog.upsert_many(std::slice::from_ref(&book)).await.expect("upsert");

    let user = unique_user();
    let now = Utc::now();
    let new = NewRental::new(user.clone(), book.id.clone(), RentalDuration::OneMonth, now);
    let rental = store.insert(new.clone()).await.expect("insert");

    assert_eq!(rental.user_id, user);
    assert_eq!(rental.duration, RentalDuration::OneMonth);
    assert_eq!(rental.price, new.price);

    let listed = store.list_for_user(&user).await.expect("list");
    assert_eq!(listed.len(), 1);

    let active = store.find_active(&user, &book.id, now).await.expect("find");
    assert_eq!(active.map(|r| r.id), Some(rental.id));

    let later = now + Duration::days(31);
    assert!(store.find_active(&user, &book.id, later).await.expect("find").is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_rental_for_unknown_book_is_conflict() {
    let store = PgRentalStore::new(test_pool().await);
    let new = NewRental::new(
        unique_user(),
        unique_book_id(),
        RentalDuration::OneYear,
        Utc::now(),
    );

    let err = store.insert(new).await.expect_err("Missing book should be rejected");
    assert!(matches!(err, RepositoryError::Conflict(_)));
}
