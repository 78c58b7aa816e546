//! Adaptive market-making strategy for the ASMM backtester.
//!
//! Provides:
//! - Reservation price and quote calculation (Avellaneda-Stoikov)
//! - Volatility regime detection on the reservation-price window
//! - Inventory ledger with cash and PnL bookkeeping
//! - The `Strategy` state machine and its `BacktestResult`
//!
//! # Architecture
//!
//! ```text
//! Venue.tick() → Strategy.step()
//!                 ├─ best bid/ask tracking
//!                 └─ re-quote cycle (every adjust_delay steps)
//!                      ├─ cancel all resting, oldest first
//!                      ├─ reservation price, volatility regime
//!                      ├─ DrawdownGuard: pause / resume
//!                      ├─ InventoryHoldTimer: forced unwind (IOC)
//!                      └─ compute_quotes → Venue.place_order()
//! ```

pub mod backtest;
pub mod config;
pub mod error;
pub mod inventory;
pub mod quote_engine;
pub mod strategy;
pub mod volatility;

pub use backtest::{BacktestResult, EquityPoint, EventCounts, RunSummary};
pub use config::{BookTracking, StrategyConfig};
pub use error::{MmError, MmResult};
pub use inventory::InventoryManager;
pub use quote_engine::{compute_quotes, reservation_price, time_to_horizon, QuotePair, QuoteParams};
pub use strategy::{CycleAction, CycleSnapshot, Strategy, StrategyEvent, StrategyEventKind};
pub use volatility::ReturnVolatilityTracker;
