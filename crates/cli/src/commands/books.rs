//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! bh books --search "matt haig"
//! bh books --category fiction --category mystery --max-price 20 --sort rating
//! bh books --tag bestseller
//! bh book 1
//! bh categories
//! ```

use std::fmt::Write as _;

use clap::Args;
use rust_decimal::Decimal;

use bookhub_core::{Book, CATEGORIES, Price, RENTAL_PLANS};
use bookhub_storefront::Result;
use bookhub_storefront::catalog::filter::{self, CatalogQuery, SortOrder, TagFilter};

use super::Context;

/// Filters for `bh books`.
#[derive(Debug, Args)]
pub struct BooksArgs {
    /// Text matched against title, author and ISBN
    #[arg(short, long)]
    search: Option<String>,

    /// Category id to include (repeatable)
    #[arg(short, long = "category")]
    categories: Vec<String>,

    /// Lowest price to include
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest price to include
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only `bestseller` or `new` books
    #[arg(short, long)]
    tag: Option<TagFilter>,

    /// `relevance`, `price-asc`, `price-desc`, `rating`, `newest` or `title`
    #[arg(long, default_value = "relevance")]
    sort: SortOrder,
}

impl BooksArgs {
    fn into_query(self) -> CatalogQuery {
        let mut query = CatalogQuery::new()
            .with_price_range(
                self.min_price.map(Price::new),
                self.max_price.map(Price::new),
            )
            .sorted_by(self.sort);
        if let Some(search) = self.search {
            query = query.with_search(search);
        }
        for category in self.categories {
            query = query.with_category(category);
        }
        if let Some(tag) = self.tag {
            query = query.with_tag(tag);
        }
        query
    }
}

/// Print the books matching `args`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context, args: BooksArgs) -> Result<()> {
    let query = args.into_query();
    let catalog = ctx.catalog().await?;
    let books = filter::apply(&catalog.list_all().await?, &query);

    tracing::debug!(
        matches = books.len(),
        filters = query.active_filter_count(),
        sort = %query.sort,
        "Catalog filtered"
    );

    for book in &books {
        println!("{}", book_line(book));
    }
    println!(
        "{} book{} ({})",
        books.len(),
        if books.len() == 1 { "" } else { "s" },
        query.sort.label()
    );
    Ok(())
}

/// Print one book in detail.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` for an unknown id.
#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, id: &str) -> Result<()> {
    let book = ctx.find_book(id).await?;
    let mut text = book_details(&book);

    let state = &ctx.state;
    if let Some(entry) = state.cart().get(&book.id) {
        let _ = writeln!(text, "In your cart: {}", entry.quantity);
    }
    if state.wishlist().contains(&book.id) {
        let _ = writeln!(text, "On your wishlist");
    }

    print!("{text}");
    Ok(())
}

/// Print every category with its book count.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
#[allow(clippy::print_stdout)]
pub async fn categories(ctx: &Context) -> Result<()> {
    let counts = ctx.catalog().await?.category_counts().await?;
    for category in CATEGORIES {
        let count = counts.get(category.id).copied().unwrap_or(0);
        println!("{} {:<12} {count:>4}  ({})", category.icon, category.name, category.id);
    }
    Ok(())
}

/// One-line summary used in listings.
pub fn book_line(book: &Book) -> String {
    let mut line = format!(
        "{:>4}  {} by {}  {}  ★{:.1}",
        book.id, book.title, book.author, book.price, book.rating
    );
    let discount = book.discount_percent();
    if discount > 0 {
        let _ = write!(line, "  -{discount}%");
    }
    if !book.in_stock {
        line.push_str("  (out of stock)");
    }
    line
}

fn book_details(book: &Book) -> String {
    let mut text = format!("{}\nby {}\n\n", book.title, book.author);

    let _ = write!(text, "Price: {}", book.price);
    if let Some(original) = book.original_price.filter(|_| book.discount_percent() > 0) {
        let _ = write!(text, " (was {original}, save {}%)", book.discount_percent());
    }
    text.push('\n');

    let _ = writeln!(text, "Rating: {:.1} ({} reviews)", book.rating, book.review_count);
    let _ = writeln!(text, "Category: {} / {}", book.category, book.genre);
    let _ = writeln!(text, "ISBN: {}  Pages: {}  Year: {}", book.isbn, book.pages, book.publication_year);
    let stock = if book.in_stock {
        format!("In stock ({})", book.stock_quantity)
    } else {
        "Out of stock".to_owned()
    };
    let _ = writeln!(text, "{stock}");

    if !book.description.is_empty() {
        let _ = writeln!(text, "\n{}", book.description);
    }

    text.push_str("\nRent to read online:\n");
    for plan in &RENTAL_PLANS {
        let popular = if plan.popular { "  (popular)" } else { "" };
        let _ = writeln!(
            text,
            "  {:<9} {:<8} {}{popular}",
            plan.duration.as_str(),
            plan.price,
            plan.description
        );
    }
    text
}
