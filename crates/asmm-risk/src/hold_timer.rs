//! Inventory hold timer.
//!
//! Starts when a fill brings `|position|` up to the inventory cap and clears
//! when a fill takes it back below. The strategy forces an unwind once the
//! position has sat at the cap for more than `max_hold_steps`.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{RiskError, RiskResult};

#[derive(Debug, Clone)]
pub struct InventoryHoldTimer {
    max_inventory: Decimal,
    max_hold_steps: u64,
    /// Step of the fill that brought the position to the cap.
    at_cap_since: Option<u64>,
}

impl InventoryHoldTimer {
    pub fn new(max_inventory: Decimal, max_hold_steps: u64) -> RiskResult<Self> {
        if max_inventory <= Decimal::ZERO {
            return Err(RiskError::ConfigError(format!(
                "max_inventory must be positive, got {max_inventory}"
            )));
        }
        Ok(Self {
            max_inventory,
            max_hold_steps,
            at_cap_since: None,
        })
    }

    /// Record the position after a fill at step `now`.
    pub fn on_position(&mut self, now: u64, position: Decimal) {
        let at_cap = position.abs() >= self.max_inventory;
        match (at_cap, self.at_cap_since) {
            (true, None) => {
                debug!(time = now, position = %position, "Inventory reached cap");
                self.at_cap_since = Some(now);
            }
            (false, Some(since)) => {
                debug!(time = now, position = %position, held = now.saturating_sub(since), "Inventory left cap");
                self.at_cap_since = None;
            }
            _ => {}
        }
    }

    /// True once the position has been at the cap for more than
    /// `max_hold_steps`.
    pub fn is_expired(&self, now: u64) -> bool {
        self.at_cap_since
            .is_some_and(|since| now.saturating_sub(since) > self.max_hold_steps)
    }

    pub fn at_cap_since(&self) -> Option<u64> {
        self.at_cap_since
    }
}
