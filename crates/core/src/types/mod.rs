//! Core types for BookHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod book;
pub mod category;
pub mod id;
pub mod price;
pub mod rental;
pub mod status;

pub use book::{Book, BookFlag, PLACEHOLDER_COVER};
pub use category::{CATEGORIES, Category};
pub use id::*;
pub use price::Price;
pub use rental::{NewRental, ParseRentalDurationError, RENTAL_PLANS, Rental, RentalDuration, RentalPlan};
pub use status::RentalStatus;
