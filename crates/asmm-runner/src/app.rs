//! Backtest orchestration.
//!
//! One seed drives the whole run: the synthetic feed is drawn first, then
//! the same generator is handed to the simulator for fill decisions.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use asmm_executor::Simulator;
use asmm_feed::MarketDataFeed;
use asmm_mm::{BacktestResult, Strategy, StrategyConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Validate the configuration and create the application.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run one backtest to completion.
    pub fn run(&self) -> AppResult<BacktestResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let feed = MarketDataFeed::synthetic(&self.config.feed, &mut rng)?;
        info!(
            seed = self.config.seed,
            ticks = feed.len(),
            "Synthetic feed generated"
        );

        let strategy_config = self.strategy_config(&feed);
        let strategy = Strategy::new(strategy_config)?;
        let mut simulator = Simulator::new(feed, self.config.execution.clone(), rng)?;

        let result = strategy.run(&mut simulator);
        let summary = result.summary();
        info!(
            steps = summary.steps,
            orders = summary.orders_submitted,
            trades = summary.trades,
            fill_rate = summary.fill_rate,
            final_position = %summary.final_position,
            final_cash = %summary.final_cash,
            final_pnl = %summary.final_pnl,
            max_drawdown = %summary.max_drawdown,
            pauses = summary.events.drawdown_pause,
            forced_unwinds = summary.events.forced_unwind,
            "Backtest complete"
        );

        Ok(result)
    }

    fn strategy_config(&self, feed: &MarketDataFeed) -> StrategyConfig {
        let mut config = self.config.strategy.clone();
        if self.config.calibrate_sigma {
            match feed.realized_sigma(self.config.periods_per_day) {
                Some(sigma) => {
                    debug!(configured = config.sigma, realized = sigma, "Calibrated sigma");
                    config.sigma = sigma;
                }
                None => warn!(
                    ticks = feed.len(),
                    "Too few ticks to calibrate sigma, keeping configured value"
                ),
            }
        }
        config
    }
}

/// Write the full result as pretty JSON.
pub fn write_result(result: &BacktestResult, path: impl AsRef<Path>) -> AppResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.flush()?;
    info!(path = %path.display(), "Result written");
    Ok(())
}
