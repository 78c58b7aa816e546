//! Order execution for the ASMM backtester.
//!
//! # Key Components
//!
//! - [`ExecutionModel`]: Stateless fill / slippage / no-fill decision for one order attempt
//! - [`Simulator`]: Owns the feed and the model, replays ticks and resolves orders
//! - [`Venue`]: The surface the strategy trades against (`tick`, `place_order`, `cancel_order`)
//!
//! Randomness is always injected: the simulator is generic over `rand::Rng`
//! and callers pass a seeded generator for reproducible fills.

pub mod config;
pub mod error;
pub mod model;
pub mod simulator;
pub mod venue;

pub use config::ExecutionConfig;
pub use error::{ExecutorError, ExecutorResult};
pub use model::{ExecutionModel, FillDecision, FillInputs};
pub use simulator::Simulator;
pub use venue::Venue;
