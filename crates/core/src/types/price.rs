//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are Vietnamese đồng. The currency has no minor unit, so prices
//! are whole numbers on the wire and are rendered with a dot as the thousands
//! separator (`250.000 ₫`).

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// A price in Vietnamese đồng.
///
/// Serializes as a JSON number, which is what the backend expects for
/// `price`, `amount` and `totalAmount` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of đồng.
    #[must_use]
    pub fn from_dong(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true when the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Line total for `quantity` units at this price.
    ///
    /// Returns `None` on decimal overflow.
    #[must_use]
    pub fn checked_mul_qty(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Line total for `quantity` units, clamped at the largest representable
    /// amount instead of overflowing.
    #[must_use]
    pub fn saturating_mul_qty(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Amount as whole đồng, rounded half away from zero.
    ///
    /// Returns `None` if the amount does not fit in an `i64`.
    #[must_use]
    pub fn to_dong(&self) -> Option<i64> {
        self.0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
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
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().trunc().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{sign}{grouped} ₫")
    }
}

/// `percent`% of `amount`, rounded half away from zero to whole đồng.
///
/// Used for commission shares and tier discounts.
#[must_use]
pub fn percent_of(amount: Price, percent: Decimal) -> Price {
    let share = amount.0 * percent / Decimal::ONE_HUNDRED;
    Price(share.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}
