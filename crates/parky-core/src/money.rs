//! # Money Module
//!
//! Provides the `Money` type for parking fees.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The fee schedule compounds a 150% multiplier per tier:                 │
//! │    300 × 1.5 × 1.5 × 1.5 = 1012.5   (float)                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents, truncating at every step                  │
//! │    300 → 450 → 675 → 1012                                               │
//! │    The half cent is dropped on purpose, and always the same way         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use parky_core::money::Money;
//!
//! let base = Money::from_cents(300);
//! assert_eq!(base.increase_by_half().cents(), 450);
//! assert_eq!(base.to_string(), "$3.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value in the smallest currency unit (cents).
///
/// Serializes as a bare integer so persisted tickets carry plain cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use parky_core::money::Money;
    ///
    /// let fee = Money::from_cents(675); // Represents $6.75
    /// assert_eq!(fee.cents(), 675);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
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

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Adds half of the current amount, truncating the half.
    ///
    /// ## Example
    /// ```rust
    /// use parky_core::money::Money;
    ///
    /// // 675 / 2 = 337 (integer division), 675 + 337 = 1012
    /// assert_eq!(Money::from_cents(675).increase_by_half().cents(), 1012);
    /// ```
    #[inline]
    pub const fn increase_by_half(&self) -> Self {
        Money(self.0 + self.0 / 2)
    }

    /// Applies [`Money::increase_by_half`] `times` times in a row.
    pub fn compound_increase(self, times: u32) -> Self {
        (0..times).fold(self, |owing, _| owing.increase_by_half())
    }
}

/// Renders as `$D.CC`, the format shown to drivers.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(300).to_string(), "$3.00");
        assert_eq!(Money::from_cents(1012).to_string(), "$10.12");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_increase_truncates_each_step() {
        let base = Money::from_cents(300);
        assert_eq!(base.compound_increase(0).cents(), 300);
        assert_eq!(base.compound_increase(1).cents(), 450);
        assert_eq!(base.compound_increase(2).cents(), 675);
        // 675 + 337, not round(1012.5)
        assert_eq!(base.compound_increase(3).cents(), 1012);
    }

    #[test]
    fn test_serializes_as_plain_cents() {
        let json = serde_json::to_string(&Money::from_cents(675)).unwrap();
        assert_eq!(json, "675");

        let back: Money = serde_json::from_str("450").unwrap();
        assert_eq!(back, Money::from_cents(450));
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(1).is_positive());
        assert_eq!(Money::default(), Money::zero());
    }
}
