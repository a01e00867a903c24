//! Catalog access.
//!
//! [`CatalogSource`] is the read-only seam between the storefront and wherever
//! books live:
//!
//! - [`PgCatalog`](crate::db::PgCatalog) - the hosted `PostgreSQL` database
//! - [`MemoryCatalog`] - a fixed list, loaded from a JSON file or built in code
//! - [`CachedCatalog`] - wraps any source with a 5-minute `moka` cache
//!
//! Browsing views fetch a slice once and hand it to [`filter::apply`] for
//! search, filtering and sorting.

mod cached;
pub mod filter;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use bookhub_core::{Book, BookFlag, BookId};

use crate::db::RepositoryError;

pub use cached::CachedCatalog;
pub use filter::{CatalogQuery, SortOrder, SortOrderParseError, TagFilter};
pub use memory::{CatalogLoadError, MemoryCatalog, SAMPLE_BOOKS_JSON};

/// Read access to the book catalog.
///
/// Orderings are part of the contract so every source lists books the same
/// way: by title unless stated otherwise.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every book, by title.
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError>;

    /// A single book, or `None` if the id is unknown.
    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError>;

    /// Books in `category`, by title.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Book>, RepositoryError>;

    /// Books carrying `flag`.
    ///
    /// Bestsellers are ordered by review count, new arrivals by most recently
    /// added, featured books by rating; all descending.
    async fn list_flagged(&self, flag: BookFlag) -> Result<Vec<Book>, RepositoryError>;

    /// Case-insensitive substring match on title, author or ISBN, by title.
    ///
    /// A blank query returns the whole catalog.
    async fn search(&self, text: &str) -> Result<Vec<Book>, RepositoryError>;

    /// Number of books.
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Number of books per category id.
    async fn category_counts(&self) -> Result<BTreeMap<String, u64>, RepositoryError>;
}

#[async_trait]
impl<C: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<C> {
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        (**self).list_all().await
    }

    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Book>, RepositoryError> {
        (**self).list_by_category(category).await
    }

    async fn list_flagged(&self, flag: BookFlag) -> Result<Vec<Book>, RepositoryError> {
        (**self).list_flagged(flag).await
    }

    async fn search(&self, text: &str) -> Result<Vec<Book>, RepositoryError> {
        (**self).search(text).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        (**self).count().await
    }

    async fn category_counts(&self) -> Result<BTreeMap<String, u64>, RepositoryError> {
        (**self).category_counts().await
    }
}
