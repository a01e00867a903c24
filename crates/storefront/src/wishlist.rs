//! Wishlist manager.
//!
//! A set of saved books without quantities. Order is insertion order; an item
//! appears at most once.

use tracing::instrument;

use bookhub_core::{Book, BookId};

use crate::notify::{Notification, Notifier};
use crate::store::{CollectionStore, WISHLIST_KEY, save_best_effort};

/// Owner of the customer's wishlist.
#[derive(Debug)]
pub struct WishlistManager<S, N> {
    store: S,
    notifier: N,
    items: Vec<Book>,
}

impl<S: CollectionStore, N: Notifier> WishlistManager<S, N> {
    /// Load the persisted wishlist, dropping duplicate ids.
    pub fn load(store: S, notifier: N) -> Self {
        let mut items: Vec<Book> = Vec::new();
        for book in store.load::<Book>(WISHLIST_KEY) {
            if !items.iter().any(|b| b.id == book.id) {
                items.push(book);
            }
        }

        tracing::debug!(items = items.len(), "Wishlist loaded");
        Self {
            store,
            notifier,
            items,
        }
    }

    /// Save `book`. Returns `false`, with no side effects, if it is already saved.
    #[instrument(skip(self, book), fields(book_id = %book.id))]
    pub fn add(&mut self, book: &Book) -> bool {
        if self.contains(&book.id) {
            return false;
        }

        self.items.push(book.clone());
        self.notifier.notify(Notification::info(
            "Added to wishlist",
            format!("{} has been saved to your wishlist", book.title),
        ));
        self.persist();
        true
    }

    /// Remove `book_id`. Returns whether it was saved.
    #[instrument(skip(self))]
    pub fn remove(&mut self, book_id: &BookId) -> bool {
        let Some(index) = self.items.iter().position(|b| &b.id == book_id) else {
            return false;
        };

        let removed = self.items.remove(index);
        self.notifier.notify(Notification::info(
            "Removed from wishlist",
            format!("{} has been removed from your wishlist", removed.title),
        ));
        self.persist();
        true
    }

    /// Save `book` if absent, remove it otherwise. Returns whether it is now saved.
    pub fn toggle(&mut self, book: &Book) -> bool {
        if self.remove(&book.id) {
            false
        } else {
            self.add(book)
        }
    }

    /// Empty the wishlist.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Whether `book_id` is saved.
    #[must_use]
    pub fn contains(&self, book_id: &BookId) -> bool {
        self.items.iter().any(|b| &b.id == book_id)
    }

    /// Saved books in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Book] {
        &self.items
    }

    /// Number of saved books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) {
        save_best_effort(&self.store, WISHLIST_KEY, &self.items);
    }
}
