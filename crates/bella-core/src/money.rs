//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats, 3 installments of 100.00 / 3 never add back up:          │
//! │    33.333333... × 3 = 99.99999999  ❌                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10000 cents / 3 = 3333 cents, remainder 1 cent                      │
//! │    The remainder is KNOWN and lands on the final installment           │
//! │    3333 + 3333 + 3334 = 10000 ✓                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bella_core::money::Money;
//!
//! let price = Money::from_cents(4990); // 49.90
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.cents(), 9980);
//!
//! let parts = Money::from_cents(10000).split_evenly(3);
//! assert_eq!(parts.iter().map(|m| m.cents()).collect::<Vec<_>>(), vec![3333, 3333, 3334]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences (e.g. receivable deltas) can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: persisted as a plain integer
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► SaleItem.unit_price ──► SaleItem.subtotal ──► Sale.total
///                                                                    │
///                                          split_evenly(n) ◄─────────┘
///                                                 │
///                                                 ▼
///                                       Installment.amount × n
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bella_core::money::Money;
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
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bella_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2990);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 8970);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Like [`Money::multiply_quantity`], but `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Addition that returns `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Splits the amount into `parts` equal shares.
    ///
    /// Every share gets `amount / parts` (integer division); the remainder
    /// cents are added to the LAST share, so the shares always sum back to
    /// the original amount exactly.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale total: 100.00, installments: 3
    ///      │
    ///      ▼
    /// split_evenly(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// [33.33, 33.33, 33.34]
    /// ```
    ///
    /// Returns an empty vector when `parts` is zero.
    pub fn split_evenly(&self, parts: u32) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }

        let n = parts as i64;
        let share = self.0 / n;
        let remainder = self.0 - share * n;

        let mut shares = vec![Money(share); parts as usize];
        if let Some(last) = shares.last_mut() {
            last.0 += remainder;
        }
        shares
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering ("1234.50"). Currency symbols are a display
/// concern of the front end (see the CLI's `format_currency`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
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

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
