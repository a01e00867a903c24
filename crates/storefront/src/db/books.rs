//! Book repository backed by the `books` table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use bookhub_core::{Book, BookFlag, BookId, PLACEHOLDER_COVER, Price};

use super::{RepositoryError, map_constraint};
use crate::catalog::CatalogSource;

const COLUMNS: &str = r"
    id, title, author, description, price, original_price, rating, review_count,
    category, genre, cover_image, isbn, publication_year, language, pages,
    in_stock, stock_quantity, is_bestseller, is_new_arrival, is_featured
";

/// Raw `books` row. Optional columns are filled with storefront defaults on conversion.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: String,
    title: String,
    author: String,
    description: Option<String>,
    price: Decimal,
    original_price: Option<Decimal>,
    rating: Option<f64>,
    review_count: i32,
    category: String,
    genre: Option<String>,
    cover_image: Option<String>,
    isbn: Option<String>,
    publication_year: Option<i32>,
    language: Option<String>,
    pages: Option<i32>,
    in_stock: Option<bool>,
    stock_quantity: Option<i32>,
    is_bestseller: bool,
    is_new_arrival: bool,
    is_featured: bool,
}

impl TryFrom<BookRow> for Book {
    type Error = RepositoryError;

    fn try_from(r: BookRow) -> Result<Self, Self::Error> {
        let non_negative = |column: &str, value: i32| {
            u32::try_from(value).map_err(|_| {
                RepositoryError::DataCorruption(format!("negative {column} for book {}: {value}", r.id))
            })
        };

        Ok(Self {
            review_count: non_negative("review_count", r.review_count)?,
            pages: non_negative("pages", r.pages.unwrap_or(0))?,
            stock_quantity: non_negative("stock_quantity", r.stock_quantity.unwrap_or(0))?,
            id: BookId::new(r.id),
            title: r.title,
            author: r.author,
            description: r.description.unwrap_or_default(),
            price: Price::new(r.price),
            original_price: r.original_price.map(Price::new),
            rating: r.rating.unwrap_or(0.0),
            category: r.category,
            genre: r.genre.unwrap_or_default(),
            cover_image: r
                .cover_image
                .unwrap_or_else(|| PLACEHOLDER_COVER.to_owned()),
            isbn: r.isbn.unwrap_or_default(),
            publication_year: r.publication_year.unwrap_or(0),
            language: r.language.unwrap_or_else(|| "English".to_owned()),
            in_stock: r.in_stock.unwrap_or(true),
            is_bestseller: r.is_bestseller,
            is_new_arrival: r.is_new_arrival,
            is_featured: r.is_featured,
        })
    }
}

fn convert(rows: Vec<BookRow>) -> Result<Vec<Book>, RepositoryError> {
    rows.into_iter().map(Book::try_from).collect()
}

fn to_i32(column: &str, value: u32) -> Result<i32, RepositoryError> {
    i32::try_from(value).map_err(|_| RepositoryError::Conflict(format!("{column} out of range: {value}")))
}

/// Escape `LIKE` metacharacters so user text matches literally.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Catalog stored in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Create a catalog over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, clause: &str, bind: Option<&str>) -> Result<Vec<Book>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM books {clause}");
        let mut query = sqlx::query_as::<_, BookRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        convert(query.fetch_all(&self.pool).await?)
    }

    /// Insert or replace `books` in a single transaction.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a value violates a table
    /// constraint, `RepositoryError::Database` for other failures. Nothing is
    /// written on error.
    #[instrument(skip(self, books), fields(books = books.len()))]
    pub async fn upsert_many(&self, books: &[Book]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for book in books {
            let result = sqlx::query(
                r"
                INSERT INTO books (
                    id, title, author, description, price, original_price, rating,
                    review_count, category, genre, cover_image, isbn, publication_year,
                    language, pages, in_stock, stock_quantity, is_bestseller,
                    is_new_arrival, is_featured
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
                ON CONFLICT (id) DO UPDATE SET
                    title = EXCLUDED.title,
                    author = EXCLUDED.author,
                    description = EXCLUDED.description,
                    price = EXCLUDED.price,
                    original_price = EXCLUDED.original_price,
                    rating = EXCLUDED.rating,
                    review_count = EXCLUDED.review_count,
                    category = EXCLUDED.category,
                    genre = EXCLUDED.genre,
                    cover_image = EXCLUDED.cover_image,
                    isbn = EXCLUDED.isbn,
                    publication_year = EXCLUDED.publication_year,
                    language = EXCLUDED.language,
                    pages = EXCLUDED.pages,
                    in_stock = EXCLUDED.in_stock,
                    stock_quantity = EXCLUDED.stock_quantity,
                    is_bestseller = EXCLUDED.is_bestseller,
                    is_new_arrival = EXCLUDED.is_new_arrival,
                    is_featured = EXCLUDED.is_featured,
                    updated_at = NOW()
                ",
            )
            .bind(book.id.as_str())
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.description)
            .bind(book.price.amount())
            .bind(book.original_price.map(|p| p.amount()))
            .bind(book.rating)
            .bind(to_i32("review_count", book.review_count)?)
            .bind(&book.category)
            .bind(&book.genre)
            .bind(&book.cover_image)
            .bind(&book.isbn)
            .bind(book.publication_year)
            .bind(&book.language)
            .bind(to_i32("pages", book.pages)?)
            .bind(book.in_stock)
            .bind(to_i32("stock_quantity", book.stock_quantity)?)
            .bind(book.is_bestseller)
            .bind(book.is_new_arrival)
            .bind(book.is_featured)
            .execute(&mut *tx)
            .await
            .map_err(map_constraint)?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        tracing::info!(written, "Books upserted");
        Ok(written)
    }
}

#[async_trait]
impl CatalogSource for PgCatalog {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        self.fetch("ORDER BY title", None).await
    }

    #[instrument(skip(self), fields(book_id = %id))]
    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, BookRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(Book::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_category(&self, category: &str) -> Result<Vec<Book>, RepositoryError> {
        self.fetch("WHERE category = $1 ORDER BY title", Some(category))
            .await
    }

    #[instrument(skip(self))]
    async fn list_flagged(&self, flag: BookFlag) -> Result<Vec<Book>, RepositoryError> {
        let clause = match flag {
            BookFlag::Bestseller => "WHERE is_bestseller ORDER BY review_count DESC",
            BookFlag::NewArrival => "WHERE is_new_arrival ORDER BY created_at DESC",
            BookFlag::Featured => "WHERE is_featured ORDER BY rating DESC NULLS LAST",
        };
        self.fetch(clause, None).await
    }

    #[instrument(skip(self))]
    async fn search(&self, text: &str) -> Result<Vec<Book>, RepositoryError> {
        let text = text.trim();
        if text.is_empty() {
            return self.list_all().await;
        }
        let pattern = like_pattern(text);
        self.fetch(
            "WHERE title ILIKE $1 OR author ILIKE $1 OR isbn ILIKE $1 ORDER BY title",
            Some(&pattern),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(count).map_err(|_| RepositoryError::DataCorruption(format!("negative count: {count}")))
    }

    #[instrument(skip(self))]
    async fn category_counts(&self) -> Result<BTreeMap<String, u64>, RepositoryError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM books GROUP BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| (category, u64::try_from(count).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("dune"), "%dune%");
        assert_eq!(like_pattern("100%_\\"), "%100\\%\\_\\\\%");
    }

    #[test]
    fn test_row_defaults() {
        let row = BookRow {
            id: "b1".to_owned(),
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            description: None,
            price: Decimal::new(1699, 2),
            original_price: None,
            rating: None,
            review_count: 3,
            category: "fiction".to_owned(),
            genre: None,
            cover_image: None,
            isbn: None,
            publication_year: None,
            language: None,
            pages: None,
            in_stock: None,
            stock_quantity: None,
            is_bestseller: false,
            is_new_arrival: false,
            is_featured: true,
        };

        let book = Book::try_from(row).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(book.cover_image, PLACEHOLDER_COVER);
        assert_eq!(book.language, "English");
        assert!(book.in_stock);
        assert_eq!(book.stock_quantity, 0);
        assert_eq!(book.publication_year, 0);
        assert!(book.is_featured);
    }

    #[test]
    fn test_negative_column_is_corruption() {
        let row = BookRow {
            id: "b1".to_owned(),
            title: String::new(),
            author: String::new(),
            description: None,
            price: Decimal::ONE,
            original_price: None,
            rating: None,
            review_count: -1,
            category: String::new(),
            genre: None,
            cover_image: None,
            isbn: None,
            publication_year: None,
            language: None,
            pages: None,
            in_stock: None,
            stock_quantity: None,
            is_bestseller: false,
            is_new_arrival: false,
            is_featured: false,
        };
        assert!(matches!(
            Book::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
