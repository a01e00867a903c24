//! Unified error type.
//!
//! Each layer has its own error enum; [`StorefrontError`] collects them for
//! callers that drive several layers at once, such as the command line.

use thiserror::Error;

use crate::catalog::{CatalogLoadError, SortOrderParseError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::rentals::RentalError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Connecting to the database failed.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Running migrations failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Local collection storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Catalog file could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogLoadError),

    /// Rental was refused.
    #[error("{0}")]
    Rental(#[from] RentalError),

    /// Order was refused.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Unknown sort key.
    #[error(transparent)]
    SortOrder(#[from] SortOrderParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
