//! Search, filter and sort over the bundled sample catalog.

use std::time::Duration;

use bookhub_core::{Book, BookFlag, BookId, Price};
use bookhub_integration_tests::sample_catalog;
use bookhub_storefront::catalog::filter::{self, CatalogQuery, SortOrder, TagFilter};
use bookhub_storefront::catalog::{CachedCatalog, CatalogSource};

fn ids(books: &[Book]) -> Vec<&str> {
    books.iter().map(|b| b.id.as_str()).collect()
}

fn rupees(paise: i64) -> Option<Price> {
    Some(Price::from_paise(paise))
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_default_query_keeps_catalog_order() {
    let catalog = sample_catalog();
    let result = filter::apply(catalog.books(), &CatalogQuery::default());
    assert_eq!(result, catalog.books());
}

#[test]
fn test_category_with_price_sort() {
    let catalog = sample_catalog();
    let query = CatalogQuery::new()
        .with_category("fiction")
        .sorted_by(SortOrder::PriceAsc);
    assert_eq!(ids(&filter::apply(catalog.books(), &query)), vec!["3", "5", "1"]);
}

#[test]
fn test_search_matches_title_and_author() {
    let catalog = sample_catalog();
    let by_title = CatalogQuery::new().with_search("brief history");
    assert_eq!(ids(&filter::apply(catalog.books(), &by_title)), vec!["4", "6"]);

    let by_author = CatalogQuery::new().with_search("  HAIG ");
    assert_eq!(ids(&filter::apply(catalog.books(), &by_author)), vec!["1"]);
}

#[test]
fn test_inclusive_price_range() {
    let catalog = sample_catalog();
    let query = CatalogQuery::new().with_price_range(rupees(1_599), rupees(1_699));
    let result = filter::apply(catalog.books(), &query);
    assert_eq!(ids(&result), vec!["1", "5", "9"]);
}

#[test]
fn test_filters_combine() {
    let catalog = sample_catalog();
    let query = CatalogQuery::new()
        .with_category("science")
        .with_tag(TagFilter::Bestseller);
    assert!(filter::apply(catalog.books(), &query).is_empty());

    let query = CatalogQuery::new()
        .with_category("science")
        .with_tag(TagFilter::NewArrival);
    assert_eq!(ids(&filter::apply(catalog.books(), &query)), vec!["12"]);
}

#[test]
fn test_newest_first() {
    let catalog = sample_catalog();
    let query = CatalogQuery::new().sorted_by(SortOrder::Newest);
    let result = filter::apply(catalog.books(), &query);
    assert_eq!(result.first().map(|b| b.id.as_str()), Some("12"));
    assert_eq!(result.last().map(|b| b.id.as_str()), Some("8"));
}

#[test]
fn test_price_sort_is_idempotent() {
    let catalog = sample_catalog();
    let query = CatalogQuery::new().sorted_by(SortOrder::PriceDesc);
    let once = filter::apply(catalog.books(), &query);
    let twice = filter::apply(&once, &query);
    assert_eq!(once, twice);
    assert!(once.windows(2).all(|w| match w {
        [a, b] => a.price >= b.price,
        _ => true,
    }));
}

// ============================================================================
// Catalog sources
// ============================================================================

#[tokio::test]
async fn test_flagged_listings() {
    let catalog = sample_catalog();

    let bestsellers = catalog.list_flagged(BookFlag::Bestseller).await.expect("list");
    assert_eq!(ids(&bestsellers), vec!["10", "6", "5", "2", "9", "3", "1"]);

    let new_arrivals = catalog.list_flagged(BookFlag::NewArrival).await.expect("list");
    assert_eq!(ids(&new_arrivals), vec!["12", "9"]);
}

#[tokio::test]
async fn test_category_counts() {
    let counts = sample_catalog().category_counts().await.expect("counts");
    assert_eq!(counts.get("fiction"), Some(&3));
    assert_eq!(counts.get("science"), Some(&2));
    assert_eq!(counts.values().sum::<u64>(), 12);
}

#[tokio::test]
async fn test_cached_catalog_matches_source() {
    let cached = CachedCatalog::with_settings(sample_catalog(), 100, Duration::from_secs(60));

    let direct = cached.source().list_all().await.expect("list");
    assert_eq!(cached.list_all().await.expect("list"), direct);
    assert_eq!(cached.list_all().await.expect("list"), direct);

    let book = cached.get_by_id(&BookId::new("7")).await.expect("get");
    assert_eq!(book.map(|b| b.title), Some("The Name of the Wind".to_owned()));
    assert_eq!(cached.count().await.expect("count"), 12);
}
