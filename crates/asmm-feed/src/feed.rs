//! Pre-materialized tick sequence.
//!
//! Every constructor validates its input and builds the full sequence up
//! front, so a run never blocks on data and never sees a malformed tick.

use asmm_core::{MarketUpdate, Price};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::bar::OhlcvBar;
use crate::config::SyntheticFeedConfig;
use crate::error::{FeedError, FeedResult};

/// Decimal places kept on synthetic prices.
const SYNTHETIC_PRICE_DP: u32 = 8;

/// Tick with the touch `half_spread` either side of `price`. `None` when
/// either side leaves the decimal range.
fn tick_around(receive_ts: i64, price: Price, half_spread: Decimal) -> Option<MarketUpdate> {
    let half = Price::new(half_spread);
    Some(MarketUpdate::new(
        receive_ts,
        price,
        price.checked_sub(half)?,
        price.checked_add(half)?,
    ))
}

/// Ordered, immutable sequence of market updates.
#[derive(Debug, Clone, Default)]
pub struct MarketDataFeed {
    updates: Vec<MarketUpdate>,
}

impl MarketDataFeed {
    /// Build a feed from already-formed updates.
    ///
    /// Fails if `receive_ts` is not strictly increasing.
    pub fn from_updates(updates: Vec<MarketUpdate>) -> FeedResult<Self> {
        for (index, pair) in updates.windows(2).enumerate() {
            if pair[1].receive_ts <= pair[0].receive_ts {
                return Err(FeedError::NonMonotonic {
                    index: index + 1,
                    prev: pair[0].receive_ts,
                    next: pair[1].receive_ts,
                });
            }
        }
        Ok(Self { updates })
    }

    /// Gaussian random walk: each tick adds `N(0, sigma)` to the previous
    /// price, starting from `start_price`.
    ///
    /// `receive_ts` is the tick index. The touch sits `half_spread` either
    /// side of the price.
    pub fn synthetic<R: Rng + ?Sized>(config: &SyntheticFeedConfig, rng: &mut R) -> FeedResult<Self> {
        config.validate()?;
        let innovation = Normal::new(0.0, config.sigma)
            .map_err(|e| FeedError::InvalidConfig(format!("sigma: {e}")))?;

        let mut price = config.start_price.to_f64().ok_or_else(|| {
            FeedError::InvalidConfig(format!("start_price: {}", config.start_price))
        })?;
        let mut updates = Vec::with_capacity(config.steps);

        for step in 0..config.steps {
            price += innovation.sample(rng);
            let px = Price::try_from_f64(price)?.round_dp(SYNTHETIC_PRICE_DP);
            let update = tick_around(step as i64, px, config.half_spread).ok_or_else(|| {
                FeedError::InvalidData(format!(
                    "tick {step}: touch around {px} +/- {} out of range",
                    config.half_spread
                ))
            })?;
            updates.push(update);
        }

        debug!(steps = config.steps, sigma = config.sigma, "Synthetic feed materialized");
        Ok(Self { updates })
    }

    /// Historical feed from OHLCV bars.
    ///
    /// `receive_ts` is the bar timestamp in Unix milliseconds. Bars without a
    /// usable close are skipped. Timestamps must strictly increase across all
    /// bars, including skipped ones.
    pub fn from_bars(bars: &[OhlcvBar], half_spread: Decimal) -> FeedResult<Self> {
        if half_spread < Decimal::ZERO {
            return Err(FeedError::InvalidConfig(format!(
                "half_spread must be non-negative, got {half_spread}"
            )));
        }

        let mut updates = Vec::with_capacity(bars.len());
        let mut prev_ts: Option<i64> = None;
        let mut skipped = 0usize;

        for (index, bar) in bars.iter().enumerate() {
            let ts = bar.timestamp.timestamp_millis();
            if let Some(prev) = prev_ts {
                if ts <= prev {
                    return Err(FeedError::NonMonotonic {
                        index,
                        prev,
                        next: ts,
                    });
                }
            }
            prev_ts = Some(ts);

            let Some(close) = bar.usable_close().and_then(Price::from_f64) else {
                debug!(index, timestamp = %bar.timestamp, close = ?bar.close, "Skipping bar without usable close");
                skipped += 1;
                continue;
            };

            let Some(update) = tick_around(ts, close, half_spread) else {
                debug!(index, close = %close, "Skipping bar with out-of-range touch");
                skipped += 1;
                continue;
            };
            updates.push(update);
        }

        debug!(bars = bars.len(), ticks = updates.len(), skipped, "Historical feed materialized");
        Ok(Self { updates })
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Tick at `index` (0-based).
    pub fn get(&self, index: usize) -> Option<&MarketUpdate> {
        self.updates.get(index)
    }

    pub fn updates(&self) -> &[MarketUpdate] {
        &self.updates
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketUpdate> {
        self.updates.iter()
    }

    /// Realized volatility of tick prices.
    ///
    /// Sample standard deviation (n - 1) of consecutive log returns, scaled
    /// by `sqrt(periods_per_day)`. `None` with fewer than three ticks or a
    /// non-positive price.
    pub fn realized_sigma(&self, periods_per_day: f64) -> Option<f64> {
        if self.updates.len() < 3 || !periods_per_day.is_finite() || periods_per_day <= 0.0 {
            return None;
        }

        let mut returns = Vec::with_capacity(self.updates.len() - 1);
        for pair in self.updates.windows(2) {
            let prev = pair[0].price.to_f64();
            let next = pair[1].price.to_f64();
            if prev <= 0.0 || next <= 0.0 {
                return None;
            }
            returns.push((next / prev).ln());
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let sigma = variance.sqrt() * periods_per_day.sqrt();
        sigma.is_finite().then_some(sigma)
    }
}
