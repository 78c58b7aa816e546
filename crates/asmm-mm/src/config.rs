//! Market making configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MmError, MmResult};

/// How best bid / best ask are tracked across ticks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookTracking {
    /// Tightest bid and ask seen since the start of the run. Never reset.
    #[default]
    SinceInception,
    /// Touch of the most recent update.
    Latest,
}

/// Strategy configuration. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Risk aversion.
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// Order-book liquidity (fill intensity decay).
    #[serde(default = "default_k")]
    pub k: f64,

    /// Price volatility used in the inventory-risk term.
    /// Zero disables the term.
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Shrink the inventory-risk term as the run nears its last step.
    #[serde(default = "default_true")]
    pub terminal_time: bool,

    /// Re-quote when `now - last_readjust > adjust_delay` (steps).
    #[serde(default = "default_adjust_delay")]
    pub adjust_delay: u64,

    /// Size of each quote.
    #[serde(default = "default_order_size")]
    pub order_size: Decimal,

    /// Unit that inventory is measured in for the reservation price.
    #[serde(default = "default_min_order_size")]
    pub min_order_size: Decimal,

    /// Decimal places quotes are rounded to.
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Hard cap on |position|.
    #[serde(default = "default_max_inventory")]
    pub max_inventory: Decimal,

    /// Extra spread per unit of squared inventory.
    #[serde(default)]
    pub inventory_penalty: f64,

    /// Drawdown ceiling that pauses quoting.
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: Decimal,

    /// Minimum pause length in steps.
    #[serde(default = "default_pause_duration")]
    pub pause_duration: u64,

    /// Number of reservation prices in the volatility window.
    #[serde(default = "default_vol_window")]
    pub vol_window: usize,

    /// Log-return std above which the high-volatility regime applies.
    #[serde(default = "default_vol_threshold")]
    pub vol_threshold: f64,

    /// Scale applied to gamma and k in the high-volatility regime.
    #[serde(default = "default_vol_multiplier")]
    pub vol_multiplier: f64,

    /// Steps the position may sit at the cap before a forced unwind.
    #[serde(default = "default_max_hold_steps")]
    pub max_hold_steps: u64,

    #[serde(default)]
    pub book_tracking: BookTracking,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            k: default_k(),
            sigma: default_sigma(),
            terminal_time: true,
            adjust_delay: default_adjust_delay(),
            order_size: default_order_size(),
            min_order_size: default_min_order_size(),
            precision: default_precision(),
            max_inventory: default_max_inventory(),
            inventory_penalty: 0.0,
            max_drawdown: default_max_drawdown(),
            pause_duration: default_pause_duration(),
            vol_window: default_vol_window(),
            vol_threshold: default_vol_threshold(),
            vol_multiplier: default_vol_multiplier(),
            max_hold_steps: default_max_hold_steps(),
            book_tracking: BookTracking::SinceInception,
        }
    }
}

impl StrategyConfig {
    /// Check every field. Called by `Strategy::new`.
    pub fn validate(&self) -> MmResult<()> {
        positive_f64("gamma", self.gamma)?;
        positive_f64("k", self.k)?;
        non_negative_f64("sigma", self.sigma)?;
        non_negative_f64("inventory_penalty", self.inventory_penalty)?;
        non_negative_f64("vol_threshold", self.vol_threshold)?;

        if !self.vol_multiplier.is_finite() || self.vol_multiplier < 1.0 {
            return Err(invalid(format!(
                "vol_multiplier must be finite and >= 1, got {}",
                self.vol_multiplier
            )));
        }
        for (name, value) in [
            ("order_size", self.order_size),
            ("min_order_size", self.min_order_size),
            ("max_inventory", self.max_inventory),
            ("max_drawdown", self.max_drawdown),
        ] {
            if value <= Decimal::ZERO {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.precision > 16 {
            return Err(invalid(format!(
                "precision must be <= 16, got {}",
                self.precision
            )));
        }
        if self.vol_window < 2 {
            return Err(invalid(format!(
                "vol_window must be >= 2, got {}",
                self.vol_window
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> MmError {
    MmError::InvalidConfig(msg)
}

fn positive_f64(name: &str, value: f64) -> MmResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(format!("{name} must be finite and positive, got {value}")));
    }
    Ok(())
}

fn non_negative_f64(name: &str, value: f64) -> MmResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}
fn default_gamma() -> f64 {
    0.05
}
fn default_k() -> f64 {
    1.5
}
fn default_sigma() -> f64 {
    0.1
}
fn default_adjust_delay() -> u64 {
    1
}
fn default_order_size() -> Decimal {
    Decimal::ONE
}
fn default_min_order_size() -> Decimal {
    Decimal::ONE
}
fn default_precision() -> u32 {
    2
}
fn default_max_inventory() -> Decimal {
    Decimal::new(5, 0)
}
fn default_max_drawdown() -> Decimal {
    Decimal::new(50, 0)
}
fn default_pause_duration() -> u64 {
    20
}
fn default_vol_window() -> usize {
    20
}
fn default_vol_threshold() -> f64 {
    0.01
}
fn default_vol_multiplier() -> f64 {
    1.5
}
fn default_max_hold_steps() -> u64 {
    30
}
