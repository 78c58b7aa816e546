//! Synthetic feed configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};

/// Parameters of the Gaussian random-walk feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticFeedConfig {
    /// Number of ticks to materialize.
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Price the walk starts from.
    #[serde(default = "default_start_price")]
    pub start_price: Decimal,

    /// Standard deviation of the per-step innovation, in price units.
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Distance from price to each side of the synthetic touch.
    #[serde(default = "default_half_spread")]
    pub half_spread: Decimal,
}

impl Default for SyntheticFeedConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            start_price: default_start_price(),
            sigma: default_sigma(),
            half_spread: default_half_spread(),
        }
    }
}

impl SyntheticFeedConfig {
    pub fn validate(&self) -> FeedResult<()> {
        if self.start_price <= Decimal::ZERO {
            return Err(FeedError::InvalidConfig(format!(
                "start_price must be positive, got {}",
                self.start_price
            )));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(FeedError::InvalidConfig(format!(
                "sigma must be finite and non-negative, got {}",
                self.sigma
            )));
        }
        if self.half_spread < Decimal::ZERO {
            return Err(FeedError::InvalidConfig(format!(
                "half_spread must be non-negative, got {}",
                self.half_spread
            )));
        }
        Ok(())
    }
}

fn default_steps() -> usize {
    200
}
fn default_start_price() -> Decimal {
    Decimal::ONE_HUNDRED
}
fn default_sigma() -> f64 {
    0.1
}
fn default_half_spread() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
