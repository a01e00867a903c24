//! BookHub Core - Shared types library.
//!
//! This crate provides common types used across all BookHub components:
//! - `storefront` - Cart, wishlist, rentals, catalog and checkout services
//! - `cli` - Command-line consumer for browsing, rentals and migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no clocks. Anything time-dependent takes `now` as an argument.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog items, categories and rental plans

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
