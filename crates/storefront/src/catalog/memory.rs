//! Fixed in-memory catalog.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use bookhub_core::{Book, BookFlag, BookId};

use super::CatalogSource;
use super::filter::{SortOrder, sort};
use crate::db::RepositoryError;

/// Errors raised while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate book id in catalog: {0}")]
    DuplicateId(BookId),
}

/// Catalog shipped with the crate, used when no other source is configured.
pub const SAMPLE_BOOKS_JSON: &str = include_str!("../../data/sample_books.json");

/// Catalog held in memory.
///
/// Insertion order stands in for creation time: later books are newer
/// arrivals.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    books: Vec<Book>,
}

impl MemoryCatalog {
    /// Build a catalog from `books`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError::DuplicateId` if two books share an id.
    pub fn from_books(books: Vec<Book>) -> Result<Self, CatalogLoadError> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if !seen.insert(&book.id) {
                return Err(CatalogLoadError::DuplicateId(book.id.clone()));
            }
        }
        Ok(Self { books })
    }

    /// Parse a JSON array of books. Missing optional fields take storefront defaults.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if the JSON is malformed or ids repeat.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogLoadError> {
        Self::from_books(serde_json::from_str(json)?)
    }

    /// Load a JSON array of books from `path`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let catalog = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        tracing::info!(path = %path.display(), books = catalog.books.len(), "Catalog file loaded");
        Ok(catalog)
    }

    /// The bundled sample catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if the bundled file is malformed.
    pub fn sample() -> Result<Self, CatalogLoadError> {
        Self::from_json_str(SAMPLE_BOOKS_JSON)
    }

    /// Books in insertion order.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    fn by_title(&self, keep: impl Fn(&Book) -> bool) -> Vec<Book> {
        let mut books: Vec<Book> = self.books.iter().filter(|b| keep(b)).cloned().collect();
        sort(&mut books, SortOrder::Title);
        books
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        Ok(self.by_title(|_| true))
    }

    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError> {
        Ok(self.books.iter().find(|b| &b.id == id).cloned())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Book>, RepositoryError> {
        Ok(self.by_title(|b| b.category == category))
    }

    async fn list_flagged(&self, flag: BookFlag) -> Result<Vec<Book>, RepositoryError> {
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|b| b.has_flag(flag))
            .cloned()
            .collect();
        match flag {
            BookFlag::Bestseller => books.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
            BookFlag::NewArrival => books.reverse(),
            BookFlag::Featured => sort(&mut books, SortOrder::RatingDesc),
        }
        Ok(books)
    }

    async fn search(&self, text: &str) -> Result<Vec<Book>, RepositoryError> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return self.list_all().await;
        }
        Ok(self.by_title(|b| {
            b.title.to_lowercase().contains(&needle)
                || b.author.to_lowercase().contains(&needle)
                || b.isbn.to_lowercase().contains(&needle)
        }))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.books.len() as u64)
    }

    async fn category_counts(&self) -> Result<BTreeMap<String, u64>, RepositoryError> {
        let mut counts = BTreeMap::new();
        for book in &self.books {
            *counts.entry(book.category.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
