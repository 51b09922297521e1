//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront amounts are US dollars. The backend sends prices as JSON
//! numbers (`49.99`); they are parsed into [`Decimal`] so that cart math
//! never accumulates binary floating point error. Prices serialize as
//! strings to preserve precision.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The portion of this price covered by `percent` (e.g. 10 -> 10%).
    #[must_use]
    pub fn percent(&self, percent: Decimal) -> Self {
        Self(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// This price after a percentage discount.
    #[must_use]
    pub fn discounted(&self, percent: Decimal) -> Self {
        *self - self.percent(percent)
    }

    /// Scale by an arbitrary rate (tax rates, for instance).
    #[must_use]
    pub fn scale(&self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }

    /// Round to whole cents, midpoints away from zero.
    #[must_use]
    pub fn round_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Format for display (e.g., "$1,234.56").
    #[must_use]
    pub fn display(&self) -> String {
        crate::format::format_currency(self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_json_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("49.99").unwrap();
        let from_string: Price = serde_json::from_str("\"49.99\"").unwrap();
        assert_eq!(from_number, Price::from_cents(4999));
        assert_eq!(from_string, Price::from_cents(4999));
    }

    #[test]
    fn test_percent_and_discount() {
        let price = Price::from_cents(5000);
        assert_eq!(price.percent(Decimal::TEN), Price::from_cents(500));
        assert_eq!(price.discounted(Decimal::TEN), Price::from_cents(4500));
    }

    #[test]
    fn test_round_cents_midpoint_away_from_zero() {
        let price = Price::new(Decimal::new(12_345, 3)); // 12.345
        assert_eq!(price.round_cents(), Price::from_cents(1235));
    }

    #[test]
    fn test_line_multiplication_and_sum() {
        let total: Price = [Price::from_cents(1999) * 2, Price::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(3999));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(123_456).to_string(), "$1,234.56");
    }
}
