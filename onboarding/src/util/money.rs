use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::{ClientError, Result};

/// An amount in the smallest currency denomination (cents).
///
/// This is the only amount representation used inside the crate. User input is
/// converted with [`MinorUnits::parse_major`] and display goes through
/// [`MinorUnits::to_major_string`]; the backend is always spoken to in minor
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub const ZERO: MinorUnits = MinorUnits(0);

    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Parse a major-unit amount typed by the user ("12", "12.5", "12.50").
    /// At most two decimal places; negative amounts are rejected.
    pub fn parse_major(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(ClientError::InvalidAmount(input.to_string()));
        }

        let major = Decimal::from_str(trimmed)
            .map_err(|_| ClientError::InvalidAmount(input.to_string()))?;
        if major.normalize().scale() > 2 {
            return Err(ClientError::InvalidAmount(input.to_string()));
        }

        major
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
            .map(Self)
            .ok_or_else(|| ClientError::InvalidAmount(input.to_string()))
    }

    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Major-unit rendering with exactly two decimals: 15000 -> "150.00".
    pub fn to_major_string(self) -> String {
        self.to_major().to_string()
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_major_string())
    }
}
