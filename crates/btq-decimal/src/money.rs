//! Exact decimal money type.
//!
//! # Motivation
//!
//! Every monetary amount in this system — cash, price, commission, P&L — is
//! backed by [`rust_decimal::Decimal`], an arbitrary-precision signed
//! fixed-point rational. Using a bare `Decimal` everywhere is error-prone:
//! it allows accidental arithmetic between unrelated quantities (a price, a
//! share count, an interest rate) that happen to share a representation.
//!
//! `Money` wraps `Decimal` so the type system prevents:
//! - Implicit construction from `f64` (no `From<f64>` impl — floating point
//!   must never cross into a money value; see [`Money::from_f64_lossy`] for
//!   the one sanctioned, explicitly-named escape hatch used only by
//!   statistical intermediates that must themselves be rounded back).
//! - Mixing `Money` with an unrelated `Decimal` (share quantity, a percentage)
//!   without an explicit conversion.
//!
//! # Rounding
//!
//! All rounding in this system is HALF_UP ("round half away from zero") at
//! an explicitly stated scale, never banker's rounding. [`Money::round_half_up`]
//! is the only rounding primitive exposed.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An exact decimal monetary amount.
///
/// # Construction
///
/// Use [`Money::new`] to wrap a [`Decimal`] that is known to represent a
/// monetary amount. There is intentionally no `From<f64>` — callers must be
/// deliberate about when a floating-point value is allowed to touch money.
///
/// # Retrieval
///
/// Use [`Money::raw`] to extract the underlying `Decimal` when crossing a
/// boundary (serialization, a statistical routine) that needs the raw type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Zero monetary amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Construct a `Money` from an already-scaled `Decimal`.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Construct from an integer number of whole units (e.g. dollars).
    #[inline]
    pub fn from_i64(whole: i64) -> Self {
        Money(Decimal::from(whole))
    }

    /// Parse an exact decimal literal (e.g. `"100.05"`). Never goes through
    /// binary floating point.
    pub fn parse(s: &str) -> Result<Self, rust_decimal::Error> {
        s.parse::<Decimal>().map(Money)
    }

    /// The one sanctioned entry point from `f64` into `Money`. Used only to
    /// cross statistical intermediates (e.g. a Monte-Carlo parametric draw)
    /// back into decimal money; the caller must immediately round the result
    /// to the scale the domain requires.
    pub fn from_f64_lossy(v: f64) -> Self {
        Money(Decimal::from_f64_retain(v).unwrap_or(Decimal::ZERO))
    }

    /// Extract the underlying `Decimal`.
    #[inline]
    pub const fn raw(self) -> Decimal {
        self.0
    }

    /// Lossy conversion to `f64`, for statistical estimators (variance,
    /// standard deviation, square roots) that have no exact decimal
    /// equivalent. Never used for a value that will be reported or compared
    /// as money.
    pub fn to_f64_lossy(self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Multiply by an integer quantity (shares, units). Exact — no rounding.
    #[inline]
    pub fn mul_qty(self, qty: i64) -> Money {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiply by a dimensionless rate (e.g. a commission or slippage
    /// fraction). Exact — no rounding; callers round explicitly afterward.
    #[inline]
    pub fn mul_rate(self, rate: Decimal) -> Money {
        Money(self.0 * rate)
    }

    /// Divide by another `Money`, producing a dimensionless `Decimal` ratio
    /// (e.g. `net_pnl / entry_value`). Returns `Decimal::ZERO` if the
    /// divisor is zero — division-by-zero is a routine edge case in this
    /// domain (an empty trade, a flat equity curve), not an error.
    pub fn div_ratio(self, divisor: Money) -> Decimal {
        if divisor.0.is_zero() {
            Decimal::ZERO
        } else {
            self.0 / divisor.0
        }
    }

    /// Round HALF_UP ("round half away from zero") to `scale` decimal
    /// places. This is the only rounding rule used anywhere in this system.
    pub fn round_half_up(self, scale: u32) -> Money {
        Money(self.0.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Absolute value.
    #[inline]
    pub fn abs(self) -> Money {
        Money(self.0.abs())
    }

    /// `true` if this amount is strictly positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// `true` if this amount is strictly negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// `true` if this amount is exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Money;
    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;
    #[inline]
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
