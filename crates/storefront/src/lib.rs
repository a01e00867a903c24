//! BookHub Storefront library.
//!
//! Customer-side state and services for the bookstore: the cart, the
//! wishlist, rentals, catalog browsing and checkout. The command-line client
//! in `bookhub-cli` is one consumer; anything that can hold a [`ShopState`]
//! and a [`CatalogSource`] is another.
//!
//! # Modules
//!
//! - [`store`] - Durable collection storage on the customer's device
//! - [`cart`], [`wishlist`] - Collections the customer edits
//! - [`session`] - Signed-in identity handed over by the auth provider
//! - [`rentals`] - Time-bounded access grants recorded in the database
//! - [`catalog`] - Catalog sources and the search/filter/sort pipeline
//! - [`checkout`] - Order summary and (mocked) order placement
//! - [`db`] - `PostgreSQL` repositories and migrations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod rentals;
pub mod session;
pub mod state;
pub mod store;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::CatalogSource;
pub use error::{Result, StorefrontError};
pub use state::ShopState;
