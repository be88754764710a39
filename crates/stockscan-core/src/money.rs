//! # Money Module
//!
//! Provides the `Money` type for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A spreadsheet cell holding 9.99 read as f64 and written back can      │
//! │  drift: 9.99 → 9.9900000000000002 after a few arithmetic round trips.  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "9.99"  ──parse──►  999  ──format──►  "9.99"                        │
//! │    The inventory file round-trips exactly, every time.                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockscan_core::money::Money;
//!
//! let price: Money = "9.99".parse().unwrap();
//! assert_eq!(price.cents(), 999);
//! assert_eq!(price.to_decimal_string(), "9.99");
//! assert_eq!(price.to_string(), "$9.99");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: parsing accepts negatives so validation can reject
///   them with a precise message instead of a generic parse failure
/// - **Two decimal places**: the inventory file stores prices as decimals
///   with at most two fractional digits
/// - **Serde as decimal string**: `"9.99"` in TOML/JSON, never a float
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockscan_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a stock quantity, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use stockscan_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    pub fn multiply_quantity(&self, qty: u64) -> Self {
        let qty = i64::try_from(qty).unwrap_or(i64::MAX);
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the value as a plain decimal, the way the inventory file
    /// stores it: `"9.99"`, `"-0.50"`, `"12.00"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal price.
///
/// ## Accepted Forms
/// ```text
/// "9.99"   → 999        "$9.99"  → 999       "10"    → 1000
/// "10.5"   → 1050       ".5"     → 50        "-1.25" → -125
/// "9.990"  → 999  (trailing zeros past the cents are fine)
/// "9.999"  → error (would lose precision)
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::invalid_format("price", reason);

        let s = s.trim();
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        let (whole, frac) = rest.split_once('.').unwrap_or((rest, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid(&format!("'{}' is not a number", s)));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid(&format!("'{}' is not a number", s)));
        }

        let (kept, dropped) = if frac.len() > 2 {
            frac.split_at(2)
        } else {
            (frac, "")
        };
        if dropped.bytes().any(|b| b != b'0') {
            return Err(invalid(&format!("'{}' has more than two decimal places", s)));
        }

        let too_large = || invalid(&format!("'{}' is too large", s));

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        let minor: i64 = match kept.len() {
            0 => 0,
            1 => kept.parse::<i64>().map_err(|_| too_large())? * 10,
            _ => kept.parse().map_err(|_| too_large())?,
        };

        let cents = whole_units
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(too_large)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money with a dollar sign: `$9.99`.
///
/// Use [`Money::to_decimal_string`] for the file format.
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

/// Addition saturates at the i64 bounds, like [`Money::multiply_quantity`].
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal price such as \"9.99\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom("price is too large"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom("price is too large"))
            .and_then(|v| self.visit_i64(v))
    }

    // TOML/JSON floats: go through the shortest round-trip representation
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        v.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

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
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(999).to_decimal_string(), "9.99");
        assert_eq!(Money::from_cents(1200).to_decimal_string(), "12.00");
        assert_eq!(Money::from_cents(-50).to_decimal_string(), "-0.50");
        assert_eq!(Money::from_cents(7).to_decimal_string(), "0.07");
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!("9.99".parse::<Money>().unwrap().cents(), 999);
        assert_eq!("$9.99".parse::<Money>().unwrap().cents(), 999);
        assert_eq!(" 10 ".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("5.".parse::<Money>().unwrap().cents(), 500);
        assert_eq!("-1.25".parse::<Money>().unwrap().cents(), -125);
        assert_eq!("9.990".parse::<Money>().unwrap().cents(), 999);
    }

    #[test]
    fn test_parse_rejected_forms() {
        assert!("".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("9.999".parse::<Money>().is_err());
        assert!("1,000".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_parse_format_is_stable() {
        for text in ["0.00", "0.01", "9.99", "10.00", "123456.78"] {
            let money: Money = text.parse().unwrap();
            assert_eq!(money.to_decimal_string(), text);
        }
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(999)).unwrap();
        assert_eq!(json, "\"9.99\"");

        let from_str: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(from_str.cents(), 1250);

        let from_float: Money = serde_json::from_str("9.99").unwrap();
        assert_eq!(from_float.cents(), 999);

        let from_int: Money = serde_json::from_str("4").unwrap();
        assert_eq!(from_int.cents(), 400);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
        assert_eq!(unit_price.multiply_quantity(0).cents(), 0);
        assert_eq!(
            Money::from_cents(i64::MAX).multiply_quantity(2).cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_add() {
        let mut total = Money::from_cents(100) + Money::from_cents(250);
        total += Money::from_cents(50);
        assert_eq!(total.cents(), 400);

        let mut total = Money::from_cents(i64::MAX - 1);
        total += Money::from_cents(999);
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) + Money::from_cents(-1)).cents(), i64::MIN);
    }
}
