//! Application configuration.

use std::path::Path;

use asmm_executor::ExecutionConfig;
use asmm_feed::SyntheticFeedConfig;
use asmm_mm::StrategyConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Top-level backtest configuration, one TOML file per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seed for both the synthetic feed and the fill model.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Replace `strategy.sigma` with the realized volatility of the feed.
    #[serde(default)]
    pub calibrate_sigma: bool,

    /// Scale for realized-sigma calibration (1440 = minute bars per day).
    #[serde(default = "default_periods_per_day")]
    pub periods_per_day: f64,

    #[serde(default)]
    pub feed: SyntheticFeedConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            calibrate_sigma: false,
            periods_per_day: default_periods_per_day(),
            feed: SyntheticFeedConfig::default(),
            execution: ExecutionConfig::default(),
            strategy: StrategyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `ASMM_CONFIG`, falling back to `config/default.toml`, then
    /// to built-in defaults.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("ASMM_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Validate every section before anything is built.
    pub fn validate(&self) -> AppResult<()> {
        if !self.periods_per_day.is_finite() || self.periods_per_day <= 0.0 {
            return Err(AppError::Config(format!(
                "periods_per_day must be finite and positive, got {}",
                self.periods_per_day
            )));
        }
        self.feed.validate()?;
        self.execution.validate()?;
        self.strategy.validate()?;
        Ok(())
    }
}

fn default_seed() -> u64 {
    42
}
fn default_periods_per_day() -> f64 {
    1440.0
}
