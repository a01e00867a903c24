//! Catalog item type.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{BookId, Price};

/// Cover shown when a book has no image of its own.
pub const PLACEHOLDER_COVER: &str = "/placeholder.svg";

/// A book exposed for browsing, purchase and rental.
///
/// Optional catalog columns are filled with storefront defaults when missing,
/// so a sparse JSON record still deserializes into a complete `Book`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// List price before discount. Only meaningful when greater than `price`.
    #[serde(default)]
    pub original_price: Option<Price>,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub category: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default = "default_cover")]
    pub cover_image: String,
    /// Identifier code matched by text search.
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub publication_year: i32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub pages: u32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_cover() -> String {
    PLACEHOLDER_COVER.to_owned()
}

fn default_language() -> String {
    "English".to_owned()
}

const fn default_in_stock() -> bool {
    true
}

/// Merchandising flags a book can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookFlag {
    Bestseller,
    NewArrival,
    Featured,
}

impl Book {
    /// Whether the book carries the given flag.
    #[must_use]
    pub const fn has_flag(&self, flag: BookFlag) -> bool {
        match flag {
            BookFlag::Bestseller => self.is_bestseller,
            BookFlag::NewArrival => self.is_new_arrival,
            BookFlag::Featured => self.is_featured,
        }
    }

    /// Discount against the original price, rounded to a whole percent.
    ///
    /// Returns 0 when there is no original price or it is not above the
    /// current price.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        let Some(original) = self.original_price else {
            return 0;
        };
        let original = original.amount();
        if original <= self.price.amount() || original.is_zero() {
            return 0;
        }

        ((original - self.price.amount()) / original * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }
}
