//! Database commands.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront migrations
//! bh migrate
//!
//! # Load the bundled sample catalog, or a JSON file of books
//! bh seed
//! bh seed --file books.json
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKHUB_DATABASE_URL` - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Storefront migrations live in `crates/storefront/migrations/`.

use std::path::Path;

use bookhub_storefront::Result;
use bookhub_storefront::catalog::MemoryCatalog;
use bookhub_storefront::db::{MIGRATOR, PgCatalog};

use super::Context;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn migrate(ctx: &Context) -> Result<()> {
    let pool = ctx.pool().await?;

    tracing::info!("Running storefront migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}

/// Insert or update the books in `file` (default: the bundled sample catalog).
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the database write fails.
#[allow(clippy::print_stdout)]
pub async fn seed(ctx: &Context, file: Option<&Path>) -> Result<()> {
    let catalog = match file {
        Some(path) => MemoryCatalog::from_json_file(path)?,
        None => MemoryCatalog::sample()?,
    };

    let pool = ctx.pool().await?;
    let written = PgCatalog::new(pool).upsert_many(catalog.books()).await?;

    tracing::info!(books = written, "Catalog seeded");
    println!("Seeded {written} books");
    Ok(())
}
