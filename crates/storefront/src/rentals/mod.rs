//! Book rentals.
//!
//! A rental gives a signed-in customer online access to a book for one of the
//! fixed [`RENTAL_PLANS`](bookhub_core::RENTAL_PLANS). Grants are recorded in a
//! [`RentalStore`] and never modified afterwards; whether one is still active
//! is computed from its expiry.
//!
//! # Concurrency
//!
//! [`RentalManager::rent`] refuses a second submission for the same user and
//! book while the first is still being recorded. It does not stop a customer
//! from renting a book they already have an active rental for.

mod clock;
mod flow;
mod memory;

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use bookhub_core::{BookId, NewRental, Rental, RentalDuration, UserId};

use crate::db::RepositoryError;
use crate::notify::{Notification, Notifier};

pub use clock::{Clock, FixedClock, SystemClock};
pub use flow::{ActionState, RentalFlow};
pub use memory::MemoryRentalStore;

/// Errors that can occur while renting a book.
#[derive(Debug, Error)]
pub enum RentalError {
    /// No customer is signed in.
    #[error("Please log in to rent books")]
    NotAuthenticated,

    /// The requested plan is not one of the offered durations.
    #[error("Invalid rental plan")]
    InvalidPlan(String),

    /// A rental for the same user and book is still being recorded.
    #[error("A rental for this book is already in progress")]
    AlreadyInFlight,

    /// The durable store rejected the rental.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Durable storage for rental grants.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Record `rental` atomically and return the stored grant.
    async fn insert(&self, rental: NewRental) -> Result<Rental, RepositoryError>;

    /// Every rental of `user_id`, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Rental>, RepositoryError>;

    /// An active rental of `book_id` by `user_id` at `now`, if any.
    async fn find_active(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        now: DateTime<Utc>,
    ) -> Result<Option<Rental>, RepositoryError>;
}

/// Keys of rentals currently being recorded.
type InFlightSet = Mutex<HashSet<(UserId, BookId)>>;

/// Removes its key from the in-flight set when dropped.
struct InFlightGuard<'a> {
    set: &'a InFlightSet,
    key: (UserId, BookId),
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a InFlightSet, key: (UserId, BookId)) -> Option<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        // Only a guard that inserted may exist; dropping one removes the key.
        inserted.then(|| Self { set, key })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Creates and looks up rentals.
pub struct RentalManager<R, C, N> {
    store: R,
    clock: C,
    notifier: N,
    in_flight: InFlightSet,
}

impl<R: RentalStore, C: Clock, N: Notifier> RentalManager<R, C, N> {
    /// Manager recording grants in `store`, timed by `clock`.
    #[must_use]
    pub fn new(store: R, clock: C, notifier: N) -> Self {
        Self {
            store,
            clock,
            notifier,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Current time according to the manager's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Rent `book_id` for `user` on the plan named `plan` (`1_month`,
    /// `6_months` or `1_year`).
    ///
    /// The outcome is also reported through the notifier.
    ///
    /// # Errors
    ///
    /// - `RentalError::NotAuthenticated` if `user` is `None`
    /// - `RentalError::InvalidPlan` if `plan` is not an offered duration
    /// - `RentalError::AlreadyInFlight` if the same rental is still being recorded
    /// - `RentalError::Repository` if the store fails
    #[instrument(skip(self))]
    pub async fn rent(
        &self,
        user: Option<&UserId>,
        book_id: &BookId,
        plan: &str,
    ) -> Result<Rental, RentalError> {
        let result = self.try_rent(user, book_id, plan).await;

        match &result {
            Ok(rental) => {
                tracing::info!(
                    rental_id = %rental.id,
                    expires_at = %rental.expires_at,
                    "Book rented"
                );
                self.notifier.notify(Notification::info(
                    "Book rented!",
                    "You can now read this book online.",
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rental failed");
                self.notifier
                    .notify(Notification::destructive("Rental failed", e.to_string()));
            }
        }

        result
    }

    async fn try_rent(
        &self,
        user: Option<&UserId>,
        book_id: &BookId,
        plan: &str,
    ) -> Result<Rental, RentalError> {
        let user = user.ok_or(RentalError::NotAuthenticated)?;
        let duration: RentalDuration = plan
            .parse()
            .map_err(|_| RentalError::InvalidPlan(plan.to_owned()))?;

        let _guard = InFlightGuard::acquire(&self.in_flight, (user.clone(), book_id.clone()))
            .ok_or(RentalError::AlreadyInFlight)?;

        let rental = NewRental::new(user.clone(), book_id.clone(), duration, self.clock.now());
        Ok(self.store.insert(rental).await?)
    }

    /// Whether `rental` is active now.
    #[must_use]
    pub fn is_active(&self, rental: &Rental) -> bool {
        rental.is_active(self.clock.now())
    }

    /// Rentals of `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RentalError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Rental>, RentalError> {
        Ok(self.store.list_for_user(user_id).await?)
    }

    /// The active rental of `book_id` by `user_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RentalError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn find_active_for_item(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<Rental>, RentalError> {
        Ok(self
            .store
            .find_active(user_id, book_id, self.clock.now())
            .await?)
    }
}
