//! Rental commands. Rentals are recorded in the database.
//!
//! # Usage
//!
//! ```bash
//! bh login u1
//! bh rent 3 --plan 6_months
//! bh rentals
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;

use bookhub_core::{BookId, NewRental, Rental, RentalStatus, UserId};
use bookhub_storefront::Result;
use bookhub_storefront::config::StorefrontConfig;
use bookhub_storefront::db::{PgRentalStore, RepositoryError, create_pool};
use bookhub_storefront::rentals::{RentalError, RentalFlow, RentalManager, RentalStore, SystemClock};

use super::Context;

/// Rental store that connects to the database on first use.
///
/// Requests the manager refuses up front (nobody signed in, unknown plan)
/// never open a connection.
struct DeferredRentalStore<'a> {
    config: &'a StorefrontConfig,
    store: OnceCell<PgRentalStore>,
}

impl<'a> DeferredRentalStore<'a> {
    fn new(config: &'a StorefrontConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }

    async fn connect(&self) -> std::result::Result<&PgRentalStore, RepositoryError> {
        self.store
            .get_or_try_init(|| async {
                let url = self
                    .config
                    .require_database_url()
                    .map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;
                tracing::info!("Connecting to storefront database...");
                Ok::<_, RepositoryError>(PgRentalStore::new(create_pool(url).await?))
            })
            .await
    }
}

#[async_trait]
impl RentalStore for DeferredRentalStore<'_> {
    async fn insert(&self, rental: NewRental) -> std::result::Result<Rental, RepositoryError> {
        self.connect().await?.insert(rental).await
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> std::result::Result<Vec<Rental>, RepositoryError> {
        self.connect().await?.list_for_user(user_id).await
    }

    async fn find_active(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        now: DateTime<Utc>,
    ) -> std::result::Result<Option<Rental>, RepositoryError> {
        self.connect().await?.find_active(user_id, book_id, now).await
    }
}

/// Rent a catalog book as the signed-in customer.
///
/// Every refusal after the book is found is also reported as a
/// "Rental failed" notification.
///
/// # Errors
///
/// Returns an error if the book is unknown, nobody is signed in, the plan is
/// unknown, or the database fails.
#[allow(clippy::print_stdout)]
pub async fn rent(ctx: &Context, book_id: &str, plan: &str) -> Result<()> {
    let book = ctx.find_book(book_id).await?;

    let manager = RentalManager::new(
        DeferredRentalStore::new(&ctx.config),
        SystemClock,
        ctx.notifier().clone(),
    );
    let flow = RentalFlow::new();
    let rental = flow
        .submit(&manager, ctx.state.current_user_id(), &book.id, plan)
        .await?;

    println!(
        "Rented \"{}\" until {} ({})",
        book.title,
        rental.expires_at.format("%Y-%m-%d"),
        rental.price
    );
    Ok(())
}

/// List the signed-in customer's rentals, newest first.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the database fails.
#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context) -> Result<()> {
    let Some(user) = ctx.state.current_user_id() else {
        return Err(RentalError::NotAuthenticated.into());
    };

    let manager = RentalManager::new(
        DeferredRentalStore::new(&ctx.config),
        SystemClock,
        ctx.notifier().clone(),
    );
    let rentals = manager.list_for_user(user).await?;
    if rentals.is_empty() {
        println!("No rentals yet");
        return Ok(());
    }

    let now = manager.now();
    for rental in &rentals {
        println!("{}", rental_line(rental, now));
    }
    Ok(())
}

/// One rental with its derived status.
pub fn rental_line(rental: &Rental, now: DateTime<Utc>) -> String {
    let status = match rental.status(now) {
        RentalStatus::Active => format!("active, {} days left", rental.days_left(now)),
        RentalStatus::Expired => "expired".to_owned(),
    };
    format!(
        "{:>4}  {:<9} {}  until {}  ({status})",
        rental.book_id,
        rental.duration.as_str(),
        rental.price,
        rental.expires_at.format("%Y-%m-%d"),
    )
}
