//! Cart manager.
//!
//! A quantity-aware collection of books, persisted to the collection store
//! after every mutation and loaded once when the session starts.
//!
//! The cart holds at most one entry per book id. Only the manager's methods
//! mutate the entries, and entries loaded from storage are normalized on the
//! way in, so the invariant holds even if the stored file was edited by hand.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use bookhub_core::{Book, BookId, Price};

use crate::notify::{Notification, Notifier};
use crate::store::{CART_KEY, CollectionStore, save_best_effort};

/// One line of the cart.
///
/// Keeps a snapshot of the book so totals can be shown without a catalog
/// round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub book: Book,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartEntry {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.book.price.times(self.quantity)
    }
}

/// What [`CartManager::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartUpdate {
    /// A new entry was appended.
    Added,
    /// An existing entry's quantity was increased.
    Updated,
}

/// Owner of the customer's cart.
#[derive(Debug)]
pub struct CartManager<S, N> {
    store: S,
    notifier: N,
    entries: Vec<CartEntry>,
}

impl<S: CollectionStore, N: Notifier> CartManager<S, N> {
    /// Load the persisted cart.
    ///
    /// Malformed stored data yields an empty cart. Duplicate ids are merged and
    /// zero-quantity entries dropped.
    pub fn load(store: S, notifier: N) -> Self {
        let stored: Vec<CartEntry> = store.load(CART_KEY);
        let mut entries: Vec<CartEntry> = Vec::with_capacity(stored.len());
        for entry in stored.into_iter().filter(|e| e.quantity > 0) {
            match entries.iter_mut().find(|e| e.book.id == entry.book.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity),
                None => entries.push(entry),
            }
        }

        tracing::debug!(entries = entries.len(), "Cart loaded");
        Self {
            store,
            notifier,
            entries,
        }
    }

    /// Add `quantity` copies of `book`.
    ///
    /// Increments the existing entry if the book is already in the cart,
    /// otherwise appends a new one. A quantity of 0 changes nothing and
    /// returns `None`.
    #[instrument(skip(self, book), fields(book_id = %book.id))]
    pub fn add(&mut self, book: &Book, quantity: u32) -> Option<CartUpdate> {
        if quantity == 0 {
            return None;
        }

        let update = if let Some(entry) = self.entry_mut(&book.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            self.notifier.notify(Notification::info(
                "Updated cart",
                format!("{} quantity updated", book.title),
            ));
            CartUpdate::Updated
        } else {
            self.entries.push(CartEntry {
                book: book.clone(),
                quantity,
            });
            self.notifier.notify(Notification::info(
                "Added to cart",
                format!("{} has been added to your cart", book.title),
            ));
            CartUpdate::Added
        };

        self.persist();
        Some(update)
    }

    /// Remove the entry for `book_id`. Returns whether an entry existed.
    #[instrument(skip(self))]
    pub fn remove(&mut self, book_id: &BookId) -> bool {
        let Some(index) = self.entries.iter().position(|e| &e.book.id == book_id) else {
            return false;
        };

        let removed = self.entries.remove(index);
        self.notifier.notify(Notification::info(
            "Removed from cart",
            format!("{} has been removed", removed.book.title),
        ));
        self.persist();
        true
    }

    /// Replace the quantity for `book_id`.
    ///
    /// A quantity of 0 removes the entry. Returns whether an entry existed.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, book_id: &BookId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(book_id);
        }

        let Some(entry) = self.entry_mut(book_id) else {
            return false;
        };
        entry.quantity = quantity;
        self.persist();
        true
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.notifier.notify(Notification::info(
            "Cart cleared",
            "All items have been removed from your cart",
        ));
        self.persist();
    }

    /// Sum of unit price times quantity over all entries.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Number of copies in the cart (not the number of entries).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |count, e| count.saturating_add(e.quantity))
    }

    /// Whether `book_id` is in the cart.
    #[must_use]
    pub fn contains(&self, book_id: &BookId) -> bool {
        self.entries.iter().any(|e| &e.book.id == book_id)
    }

    /// The entry for `book_id`, if present.
    #[must_use]
    pub fn get(&self, book_id: &BookId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.book.id == book_id)
    }

    /// Entries in the order they were added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) const fn notifier(&self) -> &N {
        &self.notifier
    }

    fn entry_mut(&mut self, book_id: &BookId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| &e.book.id == book_id)
    }

    fn persist(&self) {
        save_best_effort(&self.store, CART_KEY, &self.entries);
    }
}
