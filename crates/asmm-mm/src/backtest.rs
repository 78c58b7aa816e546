//! Run result aggregate.
//!
//! Everything a run produces is returned by value from `Strategy::run`, so
//! independent runs share no state.

use asmm_core::{BookEvent, MarketUpdate, Order, Price, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::strategy::{CycleSnapshot, StrategyEvent, StrategyEventKind};

/// Full histories of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Last step processed.
    pub steps: u64,
    pub final_position: Decimal,
    pub final_cash: Decimal,
    /// `final_cash + final_position * last tick price`.
    pub final_pnl: Decimal,
    pub realized_pnl: Decimal,
    pub avg_entry: Decimal,
    /// Traded volume in quote currency.
    pub volume: Decimal,
    /// Deepest drawdown seen at any re-quote cycle.
    pub max_drawdown: Decimal,
    pub trades: Vec<Trade>,
    pub market_updates: Vec<MarketUpdate>,
    pub book_events: Vec<BookEvent>,
    pub orders: Vec<Order>,
    pub events: Vec<StrategyEvent>,
    pub cycles: Vec<CycleSnapshot>,
    /// One mark per step.
    pub equity: Vec<EquityPoint>,
}

/// Position and mark-to-market value at the end of a step, marked at the
/// step's last tick price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub time: u64,
    pub price: Price,
    pub position: Decimal,
    pub cash: Decimal,
    /// `cash + position * price`, `None` when it leaves the decimal range.
    pub pnl: Option<Decimal>,
}

/// Count of each strategy event kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub high_volatility: usize,
    pub drawdown_pause: usize,
    pub resume_trading: usize,
    pub forced_unwind: usize,
}

impl EventCounts {
    fn from_events(events: &[StrategyEvent]) -> Self {
        let mut counts = Self::default();
        for event in events {
            match event.kind {
                StrategyEventKind::HighVolatility => counts.high_volatility += 1,
                StrategyEventKind::DrawdownPause => counts.drawdown_pause += 1,
                StrategyEventKind::ResumeTrading => counts.resume_trading += 1,
                StrategyEventKind::ForcedUnwind => counts.forced_unwind += 1,
            }
        }
        counts
    }
}

/// Fill statistics and final state of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: u64,
    pub orders_submitted: usize,
    pub trades: usize,
    /// `trades / orders_submitted`, 0 without orders.
    pub fill_rate: f64,
    /// `None` without trades or when the price sum overflows.
    pub avg_fill_price: Option<Decimal>,
    pub min_fill_price: Option<Decimal>,
    pub max_fill_price: Option<Decimal>,
    pub final_position: Decimal,
    pub final_cash: Decimal,
    pub final_pnl: Decimal,
    pub max_drawdown: Decimal,
    pub events: EventCounts,
}

impl BacktestResult {
    pub fn summary(&self) -> RunSummary {
        let prices: Vec<Decimal> = self.trades.iter().map(|t| t.price.inner()).collect();
        let avg_fill_price = prices
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p))
            .and_then(|sum| sum.checked_div(Decimal::from(prices.len())));

        let fill_rate = if self.orders.is_empty() {
            0.0
        } else {
            self.trades.len() as f64 / self.orders.len() as f64
        };

        RunSummary {
            steps: self.steps,
            orders_submitted: self.orders.len(),
            trades: self.trades.len(),
            fill_rate,
            avg_fill_price,
            min_fill_price: prices.iter().min().copied(),
            max_fill_price: prices.iter().max().copied(),
            final_position: self.final_position,
            final_cash: self.final_cash,
            final_pnl: self.final_pnl,
            max_drawdown: self.max_drawdown,
            events: EventCounts::from_events(&self.events),
        }
    }

    /// Sum of signed trade sizes (BID positive).
    pub fn net_traded(&self) -> Decimal {
        self.trades.iter().map(Trade::signed_size).sum()
    }
}
