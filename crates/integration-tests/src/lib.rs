//! Integration tests for BookHub.
//!
//! # Running Tests
//!
//! ```bash
//! # Everything that runs without a database
//! cargo test -p bookhub-integration-tests
//!
//! # Database tests (needs BOOKHUB_DATABASE_URL)
//! cargo test -p bookhub-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `shop_state` - Cart, wishlist and session persisted through the file store
//! - `catalog` - Search, filter and sort over the sample catalog
//! - `rentals` - Rental windows and the two-phase rental action
//! - `database` - `PostgreSQL` repositories (ignored by default)

use sqlx::PgPool;
use uuid::Uuid;

use bookhub_core::{BookId, UserId};
use bookhub_storefront::catalog::MemoryCatalog;
use bookhub_storefront::config::StorefrontConfig;
use bookhub_storefront::db::{MIGRATOR, create_pool};

/// The bundled sample catalog.
///
/// # Panics
///
/// Panics if the bundled catalog does not parse.
#[must_use]
pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::sample().expect("Bundled sample catalog should parse")
}

/// A customer id no other test run uses.
#[must_use]
pub fn unique_user() -> UserId {
    UserId::new(format!("it-user-{}", Uuid::new_v4()))
}

/// A book id no other test run uses.
#[must_use]
pub fn unique_book_id() -> BookId {
    BookId::new(format!("it-book-{}", Uuid::new_v4()))
}

/// Connect to the test database and bring its schema up to date.
///
/// # Panics
///
/// Panics if `BOOKHUB_DATABASE_URL` is unset or the database is unreachable.
pub async fn test_pool() -> PgPool {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");
    let url = config
        .require_database_url()
        .expect("BOOKHUB_DATABASE_URL must be set for database tests");
    let pool = create_pool(url).await.expect("Failed to connect to database");
    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}
