//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic so that cash and PnL
//! bookkeeping never accumulates floating-point drift. Model math that needs
//! `exp`/`ln` runs in `f64` and crosses back through `Price::from_f64`.
//!
//! Price arithmetic is checked: `Decimal` operators panic on overflow, and a
//! finite but extreme model term can push a price past `Decimal::MAX`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with sizes in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Convert from `f64`. Returns `None` for NaN, infinities and values
    /// outside the `Decimal` range.
    #[inline]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_f64(value).map(Self)
    }

    /// Like [`Price::from_f64`] but reports the rejected value.
    pub fn try_from_f64(value: f64) -> CoreResult<Self> {
        Self::from_f64(value).ok_or_else(|| CoreError::InvalidPrice(value.to_string()))
    }

    /// Lossy conversion for model math.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Round to `dp` decimal places, midpoint to even.
    #[inline]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// `None` on overflow.
    #[inline]
    pub fn checked_add(self, rhs: Price) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// `None` on overflow.
    #[inline]
    pub fn checked_sub(self, rhs: Price) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Midpoint of two prices, `None` if their sum overflows.
    #[inline]
    pub fn midpoint(a: Price, b: Price) -> Option<Self> {
        a.checked_add(b).map(|sum| Self(sum.0 / Decimal::TWO))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order quantity with exact decimal precision.
///
/// Always strictly positive once it reaches an order; direction lives in
/// `OrderSide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ONE: Self = Self(Decimal::ONE);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
