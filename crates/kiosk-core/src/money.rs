//! # Money Module
//!
//! The `Money` type for monetary values and the sale-level `Discount`.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  A sale total is a sum of line subtotals. Summing floats drifts, so    │
//! │  every amount is held as integer cents and the total is exact:         │
//! │    250 × 3 + 1000 × 1 = 1750 cents  ✅                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kiosk_core::money::Money;
//!
//! let price = Money::from_major_minor(2, 50); // $2.50
//! let subtotal = price * 3_i64;               // $7.50
//! assert_eq!(subtotal.cents(), 750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a bad stock adjustment or refund can go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, giving a line subtotal.
    ///
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000);
    /// assert_eq!(unit_price.multiply_quantity(1).cents(), 1000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// [`multiply_quantity`](Self::multiply_quantity), or `None` when the
    /// product doesn't fit in i64 cents.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sum of two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns this amount with `discount` taken off, rounding the
    /// discount half-up to the nearest cent.
    ///
    /// ```rust
    /// use kiosk_core::money::{Discount, Money};
    ///
    /// let total = Money::from_cents(1750);
    /// let discount = Discount::from_bps(1000).unwrap(); // 10%
    /// assert_eq!(total.apply_discount(discount).cents(), 1575);
    /// ```
    pub fn apply_discount(&self, discount: Discount) -> Money {
        // i128 so large totals can't overflow the intermediate product
        let off = (self.0 as i128 * discount.bps() as i128 + 5000) / 10000;
        Money::from_cents(self.0 - off as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// Sale-level discount in basis points (1000 = 10%).
///
/// The cashier picks a fraction in `[0, 1]` in 5% steps; stored as bps so
/// the column is an exact integer. Checkout records the discount on the
/// sale header but never folds it into the stored total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Discount(u32);

impl Discount {
    /// Upper bound: a 100% discount.
    pub const MAX_BPS: u32 = 10_000;

    /// No discount.
    #[inline]
    pub const fn none() -> Self {
        Discount(0)
    }

    /// Creates a discount from basis points, rejecting anything above 100%.
    pub fn from_bps(bps: u32) -> Result<Self, ValidationError> {
        if bps > Self::MAX_BPS {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: Self::MAX_BPS as i64,
            });
        }
        Ok(Discount(bps))
    }

    /// Creates a discount from a fraction in `[0, 1]`.
    ///
    /// ```rust
    /// use kiosk_core::money::Discount;
    ///
    /// assert_eq!(Discount::from_fraction(0.25).unwrap().bps(), 2500);
    /// assert!(Discount::from_fraction(1.5).is_err());
    /// assert!(Discount::from_fraction(f64::NAN).is_err());
    /// ```
    pub fn from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 1,
            });
        }
        Ok(Discount((fraction * Self::MAX_BPS as f64).round() as u32))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the discount as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / Self::MAX_BPS as f64
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(2, 50).cents(), 250);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1750).to_string(), "$17.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
    }

    #[test]
    fn test_line_sum_is_exact() {
        let lines = [
            Money::from_cents(250).multiply_quantity(3),
            Money::from_cents(1000).multiply_quantity(1),
        ];
        let total: Money = lines.iter().copied().sum();
        assert_eq!(total.cents(), 1750);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(250);
        assert_eq!(price.checked_multiply_quantity(3), Some(Money::from_cents(750)));
        assert_eq!(Money::from_cents(i64::MAX / 2).checked_multiply_quantity(3), None);

        assert_eq!(
            price.checked_add(Money::from_cents(1000)),
            Some(Money::from_cents(1250))
        );
        assert_eq!(
            Money::from_cents(i64::MAX / 2 + 1).checked_add(Money::from_cents(i64::MAX / 2 + 1)),
            None
        );
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Money = std::iter::empty().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_discount_bounds() {
        assert!(Discount::from_bps(0).is_ok());
        assert!(Discount::from_bps(10_000).is_ok());
        assert!(Discount::from_bps(10_001).is_err());
        assert!(Discount::from_fraction(-0.05).is_err());
        assert_eq!(Discount::from_fraction(1.0).unwrap().bps(), 10_000);
        assert_eq!(Discount::from_fraction(0.05).unwrap().bps(), 500);
    }

    #[test]
    fn test_apply_discount_rounds_half_up() {
        // 10% of $0.05 is half a cent
        let amount = Money::from_cents(5);
        let discount = Discount::from_bps(1000).unwrap();
        assert_eq!(amount.apply_discount(discount).cents(), 4);

        let full = Discount::from_bps(10_000).unwrap();
        assert!(Money::from_cents(1750).apply_discount(full).is_zero());
    }
}
