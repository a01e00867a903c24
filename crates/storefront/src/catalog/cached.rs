//! Read-through cache in front of a catalog source.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

use bookhub_core::{Book, BookFlag, BookId};

use super::CatalogSource;
use crate::db::RepositoryError;

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    All,
    Book(BookId),
    Category(String),
    Flagged(BookFlag),
    Count,
    CategoryCounts,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Books(Arc<Vec<Book>>),
    Book(Option<Box<Book>>),
    Count(u64),
    CategoryCounts(Arc<BTreeMap<String, u64>>),
}

/// Catalog source with a `moka` cache.
///
/// Listings, single books and counts are cached; searches always go to the
/// inner source.
#[derive(Clone)]
pub struct CachedCatalog<C> {
    inner: Arc<CachedCatalogInner<C>>,
}

struct CachedCatalogInner<C> {
    source: C,
    cache: Cache<CacheKey, CacheValue>,
}

impl<C: CatalogSource> CachedCatalog<C> {
    /// Wrap `source` with the default cache (1000 entries, 5 minutes).
    #[must_use]
    pub fn new(source: C) -> Self {
        Self::with_settings(source, 1000, Duration::from_secs(300))
    }

    /// Wrap `source` with a cache of `capacity` entries living for `ttl`.
    #[must_use]
    pub fn with_settings(source: C, capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CachedCatalogInner { source, cache }),
        }
    }

    /// The wrapped source.
    #[must_use]
    pub fn source(&self) -> &C {
        &self.inner.source
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    async fn cached_books<F>(&self, key: CacheKey, fetch: F) -> Result<Vec<Book>, RepositoryError>
    where
        F: Future<Output = Result<Vec<Book>, RepositoryError>> + Send,
    {
        if let Some(CacheValue::Books(books)) = self.inner.cache.get(&key).await {
            debug!(?key, "Cache hit for books");
            return Ok(books.as_ref().clone());
        }

        let books = fetch.await?;
        self.inner
            .cache
            .insert(key, CacheValue::Books(Arc::new(books.clone())))
            .await;
        Ok(books)
    }
}

#[async_trait]
impl<C: CatalogSource> CatalogSource for CachedCatalog<C> {
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        self.cached_books(CacheKey::All, self.inner.source.list_all())
            .await
    }

    #[instrument(skip(self), fields(book_id = %id))]
    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError> {
        let key = CacheKey::Book(id.clone());
        if let Some(CacheValue::Book(book)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for book");
            return Ok(book.map(|b| *b));
        }

        let book = self.inner.source.get_by_id(id).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Book(book.clone().map(Box::new)))
            .await;
        Ok(book)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Book>, RepositoryError> {
        self.cached_books(
            CacheKey::Category(category.to_owned()),
            self.inner.source.list_by_category(category),
        )
        .await
    }

    async fn list_flagged(&self, flag: BookFlag) -> Result<Vec<Book>, RepositoryError> {
        self.cached_books(CacheKey::Flagged(flag), self.inner.source.list_flagged(flag))
            .await
    }

    async fn search(&self, text: &str) -> Result<Vec<Book>, RepositoryError> {
        self.inner.source.search(text).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        if let Some(CacheValue::Count(count)) = self.inner.cache.get(&CacheKey::Count).await {
            return Ok(count);
        }
        let count = self.inner.source.count().await?;
        self.inner
            .cache
            .insert(CacheKey::Count, CacheValue::Count(count))
            .await;
        Ok(count)
    }

    async fn category_counts(&self) -> Result<BTreeMap<String, u64>, RepositoryError> {
        if let Some(CacheValue::CategoryCounts(counts)) =
            self.inner.cache.get(&CacheKey::CategoryCounts).await
        {
            return Ok(counts.as_ref().clone());
        }
        let counts = self.inner.source.category_counts().await?;
        self.inner
            .cache
            .insert(
                CacheKey::CategoryCounts,
                CacheValue::CategoryCounts(Arc::new(counts.clone())),
            )
            .await;
        Ok(counts)
    }
}
