//! Quote price calculation engine.
//!
//! Avellaneda-Stoikov quoting around a reservation price:
//!
//! ```text
//! tau         = 1 - (t - t_min) / (t_max - t_min)        (terminal-time mode)
//! reservation = mid - (pos / min_order_size) * gamma * sigma^2 * tau
//! base_spread = gamma * sigma^2 * tau + (2 / gamma) * ln(1 + gamma / k)
//! spread      = base_spread + inventory_penalty * pos^2
//! skew        = -pos * gamma * sigma^2 * tau
//! bid / ask   = round(reservation -/+ spread / 2 + skew, precision)
//! ```
//!
//! Model terms are computed in `f64`; prices stay decimal and only the
//! offsets cross over. Any non-finite term, or a price pushed out of the
//! decimal range, yields `None`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use asmm_core::Price;

/// Computed quotes for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotePair {
    pub bid: Price,
    pub ask: Price,
    /// Full spread before rounding.
    pub spread: f64,
    /// Inventory skew applied to both sides.
    pub skew: f64,
}

/// Model parameters for one quote computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteParams {
    pub gamma: f64,
    pub k: f64,
    pub sigma: f64,
    pub tau: f64,
    pub inventory_penalty: f64,
    pub precision: u32,
}

/// Fraction of the session remaining, in `[0, 1]`.
///
/// Always 1 when terminal-time mode is off or the horizon is a single step.
pub fn time_to_horizon(t: u64, t_min: u64, t_max: u64, terminal_time: bool) -> f64 {
    if !terminal_time || t_max <= t_min {
        return 1.0;
    }
    let elapsed = t.saturating_sub(t_min) as f64;
    (1.0 - elapsed / (t_max - t_min) as f64).clamp(0.0, 1.0)
}

/// Inventory-adjusted mid.
///
/// A long position pushes the reservation below mid, a short one above.
pub fn reservation_price(
    mid: Price,
    position: Decimal,
    min_order_size: Decimal,
    gamma: f64,
    sigma: f64,
    tau: f64,
) -> Option<Price> {
    if min_order_size.is_zero() {
        return None;
    }
    let units = (position / min_order_size).to_f64()?;
    let shift = units * gamma * sigma.powi(2) * tau;
    mid.checked_sub(Price::from_f64(shift)?)
}

/// Calculate bid/ask around `reservation` for the given inventory.
pub fn compute_quotes(reservation: Price, position: Decimal, params: &QuoteParams) -> Option<QuotePair> {
    let pos = position.to_f64()?;
    let risk = params.gamma * params.sigma.powi(2) * params.tau;

    let base_spread = risk + (2.0 / params.gamma) * (1.0 + params.gamma / params.k).ln();
    let spread = base_spread + params.inventory_penalty * pos.powi(2);
    let skew = -pos * risk;

    let bid = reservation.checked_add(Price::from_f64(skew - spread / 2.0)?)?;
    let ask = reservation.checked_add(Price::from_f64(skew + spread / 2.0)?)?;

    Some(QuotePair {
        bid: bid.round_dp(params.precision),
        ask: ask.round_dp(params.precision),
        spread,
        skew,
    })
}
