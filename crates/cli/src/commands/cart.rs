//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! bh cart add 1 --quantity 2
//! bh cart set 1 5
//! bh cart remove 1
//! bh cart show
//! bh cart clear
//! ```

use std::fmt::Write as _;

use bookhub_core::BookId;
use bookhub_storefront::cart::CartManager;
use bookhub_storefront::notify::Notifier;
use bookhub_storefront::store::CollectionStore;
use bookhub_storefront::{Result, StorefrontError};

use super::Context;

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    print!("{}", render(ctx.state.cart()));
}

/// Add `quantity` copies of a catalog book.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` if the catalog has no such book.
pub async fn add(ctx: &mut Context, book_id: &str, quantity: u32) -> Result<()> {
    let book = ctx.find_book(book_id).await?;
    ctx.state.cart_mut().add(&book, quantity);
    Ok(())
}

/// Remove a book from the cart.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` if the book is not in the cart.
pub fn remove(ctx: &mut Context, book_id: &str) -> Result<()> {
    if ctx.state.cart_mut().remove(&BookId::new(book_id)) {
        Ok(())
    } else {
        Err(not_in_cart(book_id))
    }
}

/// Replace a book's quantity. Zero removes it.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` if the book is not in the cart.
pub fn set_quantity(ctx: &mut Context, book_id: &str, quantity: u32) -> Result<()> {
    if ctx.state.cart_mut().set_quantity(&BookId::new(book_id), quantity) {
        Ok(())
    } else {
        Err(not_in_cart(book_id))
    }
}

pub fn clear(ctx: &mut Context) {
    ctx.state.cart_mut().clear();
}

fn not_in_cart(book_id: &str) -> StorefrontError {
    StorefrontError::NotFound(format!("book {book_id} in cart"))
}

/// Cart contents followed by the item count and total.
pub fn render<S: CollectionStore, N: Notifier>(cart: &CartManager<S, N>) -> String {
    if cart.is_empty() {
        return "Your cart is empty\n".to_owned();
    }

    let mut text = String::new();
    for entry in cart.entries() {
        let _ = writeln!(
            text,
            "{:>4}  {} x {}  {}",
            entry.book.id,
            entry.quantity,
            entry.book.title,
            entry.line_total()
        );
    }
    let _ = writeln!(text, "Items: {}  Total: {}", cart.count(), cart.total());
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookhub_core::Book;
    use bookhub_storefront::notify::MemoryNotifier;
    use bookhub_storefront::store::MemoryStore;

    use super::*;

    fn book(id: &str, price: &str) -> Book {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Book {id}"),
            "author": "Anonymous",
            "price": price,
            "category": "fiction"
        }))
        .unwrap()
    }

    #[test]
    fn test_render_empty() {
        let cart = CartManager::load(MemoryStore::new(), MemoryNotifier::new());
        assert_eq!(render(&cart), "Your cart is empty\n");
    }

    #[test]
    fn test_render_lines_and_total() {
        let mut cart = CartManager::load(MemoryStore::new(), MemoryNotifier::new());
        cart.add(&book("1", "16.99"), 2);
        cart.add(&book("2", "5.00"), 1);

        let text = render(&cart);
        assert!(text.contains("2 x Book 1  ₹33.98"));
        assert!(text.contains("1 x Book 2  ₹5.00"));
        assert!(text.ends_with("Items: 3  Total: ₹38.98\n"));
    }
}
