//! Prices in Korean won.
//!
//! The backend reports prices as whole won, so the amount is a plain
//! unsigned integer. Negative prices are rejected when decoding.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

/// A non-negative price in whole won.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Create a new price from whole won.
    #[must_use]
    pub const fn new(won: u64) -> Self {
        Self(won)
    }

    /// Get the amount in whole won.
    #[must_use]
    pub const fn won(&self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Format with thousands separators, e.g. `1,000,000원`.
    #[must_use]
    pub fn display(&self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out.push('원');
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, p| Self(acc.0.saturating_add(p.0)))
    }
}
