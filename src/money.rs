//! Money type backed by `rust_decimal`.
//!
//! Amounts, VAT and balances pulled out of log payloads keep the exact value
//! that was logged; comparisons and sums work on it. Only the textual output
//! is rounded to 4 decimal places.

use log::warn;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A monetary value, displayed with exactly 4 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use txlog_analyzer::Money;
///
/// let balance = Money::from_str("-0.00001").unwrap();
/// assert!(balance.is_negative());
/// assert_eq!(balance.to_string(), "0.0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Decimal places used when the value is written out.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Creates a whole-unit amount, mostly useful for thresholds.
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns `true` if this value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Sum, or `None` when it falls outside the decimal range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Sum clamped to the decimal range.
    pub fn saturating_add(self, rhs: Self) -> Self {
        self.checked_add(rhs).unwrap_or_else(|| {
            warn!("Money sum of {} and {} overflowed, clamping", self, rhs);
            if rhs.is_negative() {
                Money(Decimal::MIN)
            } else {
                Money(Decimal::MAX)
            }
        })
    }

    /// Value rounded half-even to the output scale, without negative zero.
    fn rounded(&self) -> Decimal {
        let rounded = self.0.round_dp(Self::SCALE);
        if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        }
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money::new)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.rounded())
    }
}

/// Saturating; see [`Money::saturating_add`].
impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
