//! Command implementations.
//!
//! Every command receives a [`Context`] holding the loaded configuration and
//! the customer's local state. Output goes to stdout; logs and notifications
//! to stderr.

pub mod books;
pub mod cart;
pub mod checkout;
pub mod db;
pub mod rentals;
pub mod session;
pub mod wishlist;

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use bookhub_core::{Book, BookId};
use bookhub_storefront::catalog::{CachedCatalog, CatalogSource, MemoryCatalog};
use bookhub_storefront::config::StorefrontConfig;
use bookhub_storefront::db::{PgCatalog, create_pool};
use bookhub_storefront::notify::{MemoryNotifier, NotificationKind, TracingNotifier};
use bookhub_storefront::store::FileStore;
use bookhub_storefront::{Result, ShopState, StorefrontError};

/// Shared state for one command invocation.
pub struct Context {
    pub config: StorefrontConfig,
    pub state: ShopState<FileStore, MemoryNotifier>,
    notifier: MemoryNotifier,
    catalog_file: Option<PathBuf>,
    /// Send notifications to the log instead of printing them.
    log_notifications: bool,
}

impl Context {
    pub fn new(
        config: StorefrontConfig,
        catalog_file: Option<PathBuf>,
        log_notifications: bool,
    ) -> Self {
        let notifier = MemoryNotifier::new();
        let state = ShopState::open(&config, notifier.clone());
        Self {
            config,
            state,
            notifier,
            catalog_file,
            log_notifications,
        }
    }

    /// Notifier shared with the cart, wishlist and rental managers.
    pub const fn notifier(&self) -> &MemoryNotifier {
        &self.notifier
    }

    /// Connect to the configured database.
    ///
    /// # Errors
    ///
    /// Returns an error if no database URL is configured or the connection fails.
    pub async fn pool(&self) -> Result<PgPool> {
        let url = self.config.require_database_url()?;
        tracing::info!("Connecting to storefront database...");
        Ok(create_pool(url).await?)
    }

    /// Catalog to browse: the `--catalog` file if given, the database if
    /// configured, otherwise the bundled sample catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be loaded or the database
    /// connection fails.
    pub async fn catalog(&self) -> Result<Arc<dyn CatalogSource>> {
        if let Some(path) = &self.catalog_file {
            return Ok(Arc::new(MemoryCatalog::from_json_file(path)?));
        }

        if self.config.database_url.is_some() {
            let cache = self.config.catalog_cache;
            let source = PgCatalog::new(self.pool().await?);
            return Ok(Arc::new(CachedCatalog::with_settings(
                source,
                cache.capacity,
                cache.ttl,
            )));
        }

        tracing::debug!("No database configured, using sample catalog");
        Ok(Arc::new(MemoryCatalog::sample()?))
    }

    /// Look up a book, failing if the catalog has no such id.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` for an unknown id.
    pub async fn find_book(&self, id: &str) -> Result<Book> {
        let catalog = self.catalog().await?;
        catalog
            .get_by_id(&BookId::new(id))
            .await?
            .ok_or_else(|| StorefrontError::NotFound(format!("book {id}")))
    }

    /// Print and discard the notifications raised so far. With JSON logs
    /// they are written to the log instead.
    #[allow(clippy::print_stderr)]
    pub fn flush_notifications(&self) {
        if self.log_notifications {
            self.notifier.replay_into(&TracingNotifier);
            return;
        }

        for notification in self.notifier.drain() {
            let marker = match notification.kind {
                NotificationKind::Info => '✓',
                NotificationKind::Destructive => '✗',
            };
            eprintln!("{marker} {}: {}", notification.title, notification.message);
        }
    }
}
