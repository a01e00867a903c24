//! Rental repository backed by the `rentals` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use bookhub_core::{BookId, NewRental, Price, Rental, RentalDuration, RentalId, RentalStatus, UserId};

use super::{RepositoryError, map_constraint};
use crate::rentals::RentalStore;

#[derive(Debug, sqlx::FromRow)]
struct RentalRow {
    id: Uuid,
    user_id: String,
    book_id: String,
    duration: String,
    price: Decimal,
    starts_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RentalRow> for Rental {
    type Error = RepositoryError;

    fn try_from(r: RentalRow) -> Result<Self, Self::Error> {
        let duration: RentalDuration = r.duration.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("rental {}: {e}", r.id))
        })?;

        Ok(Self {
            id: RentalId::new(r.id),
            user_id: UserId::new(r.user_id),
            book_id: BookId::new(r.book_id),
            duration,
            price: Price::new(r.price),
            starts_at: r.starts_at,
            expires_at: r.expires_at,
            created_at: r.created_at,
        })
    }
}

/// Rental grants stored in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgRentalStore {
    pool: PgPool,
}

impl PgRentalStore {
    /// Create a store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalStore for PgRentalStore {
    /// Insert inside a transaction; the row is either fully recorded or absent.
    #[instrument(skip(self, rental), fields(user_id = %rental.user_id, book_id = %rental.book_id))]
    async fn insert(&self, rental: NewRental) -> Result<Rental, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, RentalRow>(
            r"
            INSERT INTO rentals (id, user_id, book_id, duration, price, starts_at, expires_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, book_id, duration, price, starts_at, expires_at, created_at
            ",
        )
        .bind(RentalId::generate().as_uuid())
        .bind(rental.user_id.as_str())
        .bind(rental.book_id.as_str())
        .bind(rental.duration.as_str())
        .bind(rental.price.amount())
        .bind(rental.starts_at)
        .bind(rental.expires_at)
        .bind(RentalStatus::Active.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_constraint)?;

        tx.commit().await?;
        Rental::try_from(row)
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Rental>, RepositoryError> {
        sqlx::query_as::<_, RentalRow>(
            r"
            SELECT id, user_id, book_id, duration, price, starts_at, expires_at, created_at
            FROM rentals
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Rental::try_from)
        .collect()
    }

    #[instrument(skip(self))]
    async fn find_active(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        now: DateTime<Utc>,
    ) -> Result<Option<Rental>, RepositoryError> {
        sqlx::query_as::<_, RentalRow>(
            r"
            SELECT id, user_id, book_id, duration, price, starts_at, expires_at, created_at
            FROM rentals
            WHERE user_id = $1 AND book_id = $2 AND status = $3 AND expires_at > $4
            ORDER BY expires_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id.as_str())
        .bind(book_id.as_str())
        .bind(RentalStatus::Active.to_string())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .map(Rental::try_from)
        .transpose()
    }
}
