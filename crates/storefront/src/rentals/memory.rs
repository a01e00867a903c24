//! In-memory rental store.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bookhub_core::{BookId, NewRental, Rental, RentalId, UserId};

use super::RentalStore;
use crate::db::RepositoryError;

/// Process-local rental store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryRentalStore {
    rentals: Arc<Mutex<Vec<Rental>>>,
}

impl MemoryRentalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded rental, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<Rental> {
        self.rentals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RentalStore for MemoryRentalStore {
    async fn insert(&self, rental: NewRental) -> Result<Rental, RepositoryError> {
        let created = Rental {
            id: RentalId::generate(),
            user_id: rental.user_id,
            book_id: rental.book_id,
            duration: rental.duration,
            price: rental.price,
            starts_at: rental.starts_at,
            expires_at: rental.expires_at,
            created_at: rental.starts_at,
        };
        self.rentals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(created.clone());
        Ok(created)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Rental>, RepositoryError> {
        let rentals = self.rentals.lock().unwrap_or_else(PoisonError::into_inner);
        let mut mine: Vec<Rental> = rentals
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        // Newest first; later inserts win ties.
        mine.reverse();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_active(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        now: DateTime<Utc>,
    ) -> Result<Option<Rental>, RepositoryError> {
        let rentals = self.rentals.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rentals
            .iter()
            .filter(|r| &r.user_id == user_id && &r.book_id == book_id && r.is_active(now))
            .max_by_key(|r| r.expires_at)
            .cloned())
    }
}
