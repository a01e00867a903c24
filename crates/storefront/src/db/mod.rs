//! Database operations for the hosted storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `books` - Catalog items
//! - `rentals` - Recorded rental grants (append-only)
//!
//! Cart, wishlist and session state never touch the database; they live in
//! the collection store on the customer's device.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p bookhub-cli -- migrate
//! ```

pub mod books;
pub mod rentals;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use books::PgCatalog;
pub use rentals::PgRentalStore;

/// Embedded storefront migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., rental for an unknown book).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map constraint violations to [`RepositoryError::Conflict`].
fn map_constraint(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_foreign_key_violation() || db.is_unique_violation() || db.is_check_violation() =>
        {
            RepositoryError::Conflict(db.message().to_owned())
        }
        _ => RepositoryError::Database(e),
    }
}
