//! Rental plans and rental grants.
//!
//! A rental grants a user time-bounded online access to a book. The grant is
//! immutable once recorded; whether it is still active is derived from its
//! expiry and the current time, never stored.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookId, Price, RentalId, RentalStatus, UserId};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Error returned when a rental duration id is not one of the offered plans.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid rental plan: {0}")]
pub struct ParseRentalDurationError(pub String);

/// Duration class of a rental.
///
/// Defaults to the one-year plan, the storefront's preselected choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RentalDuration {
    #[serde(rename = "1_month")]
    OneMonth,
    #[serde(rename = "6_months")]
    SixMonths,
    #[default]
    #[serde(rename = "1_year")]
    OneYear,
}

impl RentalDuration {
    /// Number of days of access the plan grants.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::OneMonth => 30,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        }
    }

    /// Stable id used in storage and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1_month",
            Self::SixMonths => "6_months",
            Self::OneYear => "1_year",
        }
    }

    /// The priced plan for this duration.
    #[must_use]
    pub const fn plan(self) -> &'static RentalPlan {
        match self {
            Self::OneMonth => &RENTAL_PLANS[0],
            Self::SixMonths => &RENTAL_PLANS[1],
            Self::OneYear => &RENTAL_PLANS[2],
        }
    }
}

impl fmt::Display for RentalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalDuration {
    type Err = ParseRentalDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1_month" => Ok(Self::OneMonth),
            "6_months" => Ok(Self::SixMonths),
            "1_year" => Ok(Self::OneYear),
            other => Err(ParseRentalDurationError(other.to_owned())),
        }
    }
}

/// A rental plan offered to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentalPlan {
    pub duration: RentalDuration,
    pub label: &'static str,
    pub price: Price,
    pub description: &'static str,
    /// Highlighted as the recommended plan.
    pub popular: bool,
}

/// Plans in display order.
pub const RENTAL_PLANS: [RentalPlan; 3] = [
    RentalPlan {
        duration: RentalDuration::OneMonth,
        label: "1 Month",
        price: Price::new(Decimal::from_parts(99, 0, 0, false, 0)),
        description: "30 days access",
        popular: false,
    },
    RentalPlan {
        duration: RentalDuration::SixMonths,
        label: "6 Months",
        price: Price::new(Decimal::from_parts(399, 0, 0, false, 0)),
        description: "180 days access",
        popular: false,
    },
    RentalPlan {
        duration: RentalDuration::OneYear,
        label: "1 Year",
        price: Price::new(Decimal::from_parts(599, 0, 0, false, 0)),
        description: "365 days access",
        popular: true,
    },
];

/// A rental about to be recorded by the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRental {
    pub user_id: UserId,
    pub book_id: BookId,
    pub duration: RentalDuration,
    pub price: Price,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewRental {
    /// Price and date a rental starting at `now`.
    #[must_use]
    pub fn new(user_id: UserId, book_id: BookId, duration: RentalDuration, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            book_id,
            duration,
            price: duration.plan().price,
            starts_at: now,
            expires_at: now + Duration::days(duration.days()),
        }
    }
}

/// A recorded rental grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub duration: RentalDuration,
    /// Price paid.
    pub price: Price,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Rental {
    /// Whether the rental still grants access at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Derived status at `now`.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> RentalStatus {
        if self.is_active(now) {
            RentalStatus::Active
        } else {
            RentalStatus::Expired
        }
    }

    /// Whole days of access left, rounded up; 0 once expired.
    #[must_use]
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        let remaining = (self.expires_at - now).num_milliseconds();
        if remaining <= 0 {
            return 0;
        }
        (remaining + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }
}
