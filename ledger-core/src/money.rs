//! Fixed-point money
//!
//! Every amount that enters the ledger is a [`Money`]: an exact decimal with
//! exactly two fractional digits. Rounding is half-up (away from zero on the
//! midpoint) at construction and after every arithmetic result, so the
//! engine's rounding step is the single place cents are truncated.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Number of fractional digits carried by every [`Money`] value
pub const SCALE: u32 = 2;

/// Round a raw decimal to cents, half-up.
pub fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

/// Exact decimal amount with two fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, SCALE));

    /// Create from a raw decimal, rounding half-up to cents
    pub fn new(value: Decimal) -> Self {
        Self(round_cents(value))
    }

    /// Create from an integer number of cents
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, SCALE))
    }

    /// Underlying decimal value (always scale 2)
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// True if exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True if strictly below zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// True if strictly above zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// True if `|self - other| <= tolerance`
    pub fn approx_eq(&self, other: Money, tolerance: Decimal) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl From<i64> for Money {
    fn from(dollars: i64) -> Self {
        Money::new(Decimal::from(dollars))
    }
}

impl FromStr for Money {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let cleaned = s.trim().trim_start_matches('$').replace(',', "");
        Decimal::from_str(&cleaned)
            .map(Money::new)
            .map_err(|e| crate::Error::InvalidArgument(format!("invalid amount '{}': {}", s, e)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::new(-self.0)
    }
}

/// Scale by a ratio (e.g. a rent percentage), rounding the product to cents
impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rhs: Decimal) -> Money {
        Money::new(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(Money::new(dec("26.495")).amount(), dec("26.50"));
        assert_eq!(Money::new(dec("0.005")).amount(), dec("0.01"));
        assert_eq!(Money::new(dec("2.345")).amount(), dec("2.35"));
        assert_eq!(Money::new(dec("2.344")).amount(), dec("2.34"));
        assert_eq!(Money::new(dec("-2.345")).amount(), dec("-2.35"));
    }

    #[test]
    fn test_always_two_places() {
        assert_eq!(Money::from(50).to_string(), "50.00");
        assert_eq!(Money::new(dec("7.5")).to_string(), "7.50");
        assert_eq!(Money::from_cents(1).to_string(), "0.01");
    }

    #[test]
    fn test_zero_keeps_two_places() {
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(Money::default().to_string(), "0.00");
        assert_eq!(serde_json::to_string(&Money::ZERO).unwrap(), "\"0.00\"");
        assert_eq!(Money::ZERO.amount().scale(), SCALE);
    }

    #[test]
    fn test_percentage_multiplication() {
        let rent = Money::from(2000);
        assert_eq!(rent * dec("0.43"), Money::from(860));
        assert_eq!(Money::new(dec("1999.99")) * dec("0.47"), Money::new(dec("940.00")));
    }

    #[test]
    fn test_parse() {
        assert_eq!("$1,234.565".parse::<Money>().unwrap().amount(), dec("1234.57"));
        assert!("twelve".parse::<Money>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Money::from_cents(12345)).unwrap();
        assert_eq!(json, "\"123.45\"");
        let back: Money = serde_json::from_str("\"10.005\"").unwrap();
        assert_eq!(back, Money::from_cents(1001));
    }

    #[test]
    fn test_sum_and_tolerance() {
        let total: Money = [Money::from_cents(1), Money::from_cents(2)].iter().sum();
        assert_eq!(total, Money::from_cents(3));
        assert!(total.approx_eq(Money::from_cents(5), dec("0.02")));
        assert!(!total.approx_eq(Money::from_cents(6), dec("0.02")));
    }
}
