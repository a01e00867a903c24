//! Wishlist commands.

use bookhub_core::BookId;
use bookhub_storefront::{Result, StorefrontError};

use super::Context;
use super::books::book_line;

#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    let wishlist = ctx.state.wishlist();
    if wishlist.is_empty() {
        println!("Your wishlist is empty");
        return;
    }
    for book in wishlist.items() {
        println!("{}", book_line(book));
    }
}

/// Save a catalog book.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` if the catalog has no such book.
pub async fn add(ctx: &mut Context, book_id: &str) -> Result<()> {
    let book = ctx.find_book(book_id).await?;
    if !ctx.state.wishlist_mut().add(&book) {
        tracing::info!(book_id, "Already on wishlist");
    }
    Ok(())
}

/// Forget a saved book.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` if the book is not on the wishlist.
pub fn remove(ctx: &mut Context, book_id: &str) -> Result<()> {
    if ctx.state.wishlist_mut().remove(&BookId::new(book_id)) {
        Ok(())
    } else {
        Err(StorefrontError::NotFound(format!("book {book_id} on wishlist")))
    }
}

/// Save a book, or forget it if it is already saved.
///
/// # Errors
///
/// Returns `StorefrontError::NotFound` if the book has to be looked up and
/// the catalog has no such id.
pub async fn toggle(ctx: &mut Context, book_id: &str) -> Result<()> {
    let id = BookId::new(book_id);
    if ctx.state.wishlist().contains(&id) {
        ctx.state.wishlist_mut().remove(&id);
        return Ok(());
    }
    let book = ctx.find_book(book_id).await?;
    ctx.state.wishlist_mut().toggle(&book);
    Ok(())
}

pub fn clear(ctx: &mut Context) {
    ctx.state.wishlist_mut().clear();
}
