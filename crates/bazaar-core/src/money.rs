//! # Money Module
//!
//! Provides the `Money` type used for item prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Price form input        Stored                 Displayed              │
//! │  ────────────────        ──────                 ─────────              │
//! │  "12.50"          ──►    price_cents = 1250 ──► "12.50"                │
//! │  "3"              ──►    price_cents = 300  ──► "3.00"                 │
//! │  "0.5"            ──►    price_cents = 50   ──► "0.50"                 │
//! │                                                                         │
//! │  Sorting by price in SQL compares integers, never floats.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price: Money = "12.50".parse().unwrap();
//! assert_eq!(price.cents(), 1250);
//! assert_eq!(price.to_string(), "12.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that a negative submission can be parsed and then rejected by
/// the price validator with a field message rather than a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
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

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a decimal string such as `"12.50"`, `"-3"` or `".5"`.
    ///
    /// ## Rules
    /// - Optional leading `-` or `+`
    /// - At most two fractional digits
    /// - Surrounding whitespace is ignored
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("0.5").unwrap().cents(), 50);
    /// assert!(Money::parse_decimal("1.234").is_err());
    /// assert!(Money::parse_decimal("abc").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, CoreError> {
        let invalid = || CoreError::InvalidMoney(input.to_string());

        let text = input.trim();
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (major_text, minor_text) = match unsigned.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (unsigned, ""),
        };

        if major_text.is_empty() && minor_text.is_empty() {
            return Err(invalid());
        }
        if minor_text.len() > 2 {
            return Err(invalid());
        }
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(major_text) || !all_digits(minor_text) {
            return Err(invalid());
        }

        let major: i64 = if major_text.is_empty() {
            0
        } else {
            major_text.parse().map_err(|_| invalid())?
        };
        let minor: i64 = match minor_text.len() {
            0 => 0,
            1 => minor_text.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => minor_text.parse().map_err(|_| invalid())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as a plain decimal with two fractional digits (`12.50`).
///
/// The currency symbol belongs to the view, not to the value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
