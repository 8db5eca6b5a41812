//! Type-safe price representation using decimal arithmetic.
//!
//! The store sells in a single currency, so a price is just an amount. All
//! arithmetic happens on [`Decimal`] so that line subtotals and order totals
//! never pick up floating-point drift.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency.
///
/// Serializes as a decimal string (`"25.99"`) and accepts either a string or
/// a JSON number on input.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded to two decimal places, halves away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

/// Line subtotal: unit price times quantity.
impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_decimals() {
        assert_eq!(Price::new(Decimal::from(20)).to_string(), "$20.00");
        assert_eq!(Price::from_cents(2599).to_string(), "$25.99");
        assert_eq!(Price::new(Decimal::new(15, 1)).to_string(), "$1.50");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::new(Decimal::new(10_005, 3)).to_string(), "$10.01");
    }

    #[test]
    fn test_multiply_by_quantity() {
        let subtotal = Price::from_cents(2599) * 3;
        assert_eq!(subtotal, Price::from_cents(7797));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Price = Vec::<Price>::new().into_iter().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_deserialize_accepts_number_and_string() {
        let from_number: Price = serde_json::from_str("2.5").unwrap();
        let from_string: Price = serde_json::from_str("\"2.5\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Price::from_cents(250));
    }
}
