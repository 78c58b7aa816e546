//! Risk controls for the ASMM strategy.
//!
//! - DrawdownGuard: ACTIVE/PAUSED latch driven by running-max PnL drawdown
//! - InventoryHoldTimer: Detects inventory pinned at the cap for too long
//!
//! Neither control raises for trading conditions. A breach is reported as a
//! state transition and the strategy decides what to suppress.

pub mod drawdown;
pub mod error;
pub mod hold_timer;

pub use drawdown::{DrawdownGuard, RiskTransition, TradingState};
pub use error::{RiskError, RiskResult};
pub use hold_timer::InventoryHoldTimer;
