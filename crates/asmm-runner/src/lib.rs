//! ASMM backtest runner.
//!
//! Loads a TOML configuration, materializes a seeded synthetic feed, runs
//! the strategy against the simulator and hands back the full result.

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
