//! Execution model configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ExecutorError, ExecutorResult};

/// Coefficients of the fill probability model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Decay per unit of queue position ratio.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Decay per unit of normalized price distance.
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Decay per unit of order size ratio.
    #[serde(default = "default_size_decay")]
    pub size_decay: f64,

    /// Added to the fill probability when the next mid moves toward the order.
    #[serde(default = "default_favorable_move_bonus")]
    pub favorable_move_bonus: f64,

    /// Width of the slippage band drawn above the fill probability.
    #[serde(default = "default_slippage_chance")]
    pub slippage_chance: f64,

    /// Size that counts as a full-depth order (`order_size_ratio = size / reference_depth`).
    #[serde(default = "default_reference_depth")]
    pub reference_depth: Decimal,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            size_decay: default_size_decay(),
            favorable_move_bonus: default_favorable_move_bonus(),
            slippage_chance: default_slippage_chance(),
            reference_depth: default_reference_depth(),
        }
    }
}

impl ExecutionConfig {
    pub fn validate(&self) -> ExecutorResult<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("size_decay", self.size_decay),
            ("favorable_move_bonus", self.favorable_move_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ExecutorError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.slippage_chance) {
            return Err(ExecutorError::InvalidConfig(format!(
                "slippage_chance must be in [0, 1], got {}",
                self.slippage_chance
            )));
        }
        if self.reference_depth <= Decimal::ZERO {
            return Err(ExecutorError::InvalidConfig(format!(
                "reference_depth must be positive, got {}",
                self.reference_depth
            )));
        }
        Ok(())
    }
}

fn default_alpha() -> f64 {
    5.0
}
fn default_beta() -> f64 {
    15.0
}
fn default_size_decay() -> f64 {
    0.5
}
fn default_favorable_move_bonus() -> f64 {
    0.1
}
fn default_slippage_chance() -> f64 {
    0.1
}
fn default_reference_depth() -> Decimal {
    Decimal::TEN
}
