//! Type-safe price representation using decimal arithmetic.
//!
//! The store trades in Indian Rupees only, so a price is a bare decimal amount
//! in rupees. Display uses the Indian digit grouping (`₹1,23,456.00`).

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount of money in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// Create a price from paise (hundredths of a rupee).
    #[must_use]
    pub fn from_paise(paise: i64) -> Self {
        Self(Decimal::new(paise, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line price for `quantity` units. Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Multiply by a rate such as a tax percentage expressed as a fraction.
    /// Saturates instead of overflowing.
    #[must_use]
    pub fn scaled(self, rate: Decimal) -> Self {
        Self(self.0.saturating_mul(rate))
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Saturating: totals of absurd prices clamp to [`Decimal::MAX`].
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .abs()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{rounded:.2}");
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let sign = if self.0.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{sign}₹{}.{fraction}", group_indian(whole))
    }
}

/// Insert Indian-style separators: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    if !head.is_empty() {
        groups.push(head);
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_small_amounts() {
        assert_eq!(Price::from_rupees(0).to_string(), "₹0.00");
        assert_eq!(Price::from_rupees(99).to_string(), "₹99.00");
        assert_eq!(Price::from_paise(59_950).to_string(), "₹599.50");
    }

    #[test]
    fn test_display_indian_grouping() {
        assert_eq!(Price::from_rupees(1_000).to_string(), "₹1,000.00");
        assert_eq!(Price::from_rupees(123_456).to_string(), "₹1,23,456.00");
        assert_eq!(Price::from_rupees(12_345_678).to_string(), "₹1,23,45,678.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        let price = Price::new("10.125".parse().unwrap());
        assert_eq!(price.to_string(), "₹10.13");
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::from_paise(1_050);
        assert_eq!(unit.times(3), Price::from_paise(3_150));
        let total: Price = [unit, unit.times(2)].into_iter().sum();
        assert_eq!(total, Price::from_paise(3_150));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(max + Price::from_rupees(1), max);
        assert_eq!(max.scaled(Decimal::TWO), max);

        let total: Price = [max, max, Price::from_paise(1)].into_iter().sum();
        assert_eq!(total, max);
        assert!(total.to_string().starts_with('₹'));
    }

    #[test]
    fn test_serde_is_transparent_string() {
        let json = serde_json::to_string(&Price::from_paise(1_999)).unwrap();
        assert_eq!(json, "\"19.99\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::from_paise(1_999));
    }
}
