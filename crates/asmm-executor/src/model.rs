//! Probabilistic fill model.
//!
//! ```text
//! p = exp(-alpha * queue) * exp(-beta * distance) * exp(-size_decay * size_ratio)
//! p += bonus            if the next mid moves toward the order
//! p = clamp(p, 0, 1)
//! r ~ U[0, 1)
//!   r < p                    -> Filled
//!   p <= r < p + slippage    -> Slippage
//!   otherwise                -> NotFilled
//! ```

use asmm_core::OrderSide;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ExecutionConfig;

/// Inputs to a single fill decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillInputs {
    pub side: OrderSide,
    /// 0 = front of queue, 1 = back.
    pub queue_position_ratio: f64,
    /// Passive distance from the reference mid, normalized by the mid.
    pub price_distance: f64,
    /// Signed mid change to the next tick.
    pub price_movement: f64,
    /// Order size relative to the reference depth.
    pub order_size_ratio: f64,
}

impl FillInputs {
    /// A falling mid favors a resting bid, a rising mid a resting ask.
    pub fn movement_favors_order(&self) -> bool {
        match self.side {
            OrderSide::Bid => self.price_movement < 0.0,
            OrderSide::Ask => self.price_movement > 0.0,
        }
    }
}

/// Outcome of a fill decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillDecision {
    /// Fill at the requested price.
    Filled,
    /// Fill at the next mid.
    Slippage,
    NotFilled,
}

/// Stateless execution model. All randomness comes from the caller.
#[derive(Debug, Clone)]
pub struct ExecutionModel {
    config: ExecutionConfig,
}

impl ExecutionModel {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Fill probability in `[0, 1]`.
    pub fn fill_probability(&self, inputs: &FillInputs) -> f64 {
        let c = &self.config;
        let mut p = (-c.alpha * inputs.queue_position_ratio).exp()
            * (-c.beta * inputs.price_distance).exp()
            * (-c.size_decay * inputs.order_size_ratio).exp();
        if inputs.movement_favors_order() {
            p += c.favorable_move_bonus;
        }
        if p.is_nan() {
            return 0.0;
        }
        p.clamp(0.0, 1.0)
    }

    /// Draw one decision.
    pub fn decide<R: Rng + ?Sized>(&self, inputs: &FillInputs, rng: &mut R) -> FillDecision {
        let p = self.fill_probability(inputs);
        let r: f64 = rng.gen();
        if r < p {
            FillDecision::Filled
        } else if r < p + self.config.slippage_chance {
            FillDecision::Slippage
        } else {
            FillDecision::NotFilled
        }
    }
}

impl Default for ExecutionModel {
    fn default() -> Self {
        Self::new(ExecutionConfig::default())
    }
}
