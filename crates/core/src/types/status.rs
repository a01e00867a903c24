//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Rental status, derived from the expiry timestamp.
///
/// The database records `active` at insert time only; the current value
/// always comes from [`crate::Rental::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// The rental grants access right now.
    Active,
    /// The rental period is over.
    Expired,
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            _ => Err(format!("invalid rental status: {s}")),
        }
    }
}
