//! Adaptive market-making state machine.
//!
//! One `Strategy` owns all mutable run state: resting orders, inventory,
//! risk latches and the histories returned at the end. It is driven one
//! step at a time against a [`Venue`].
//!
//! Re-quote cycle (runs when `now - last_readjust > adjust_delay`):
//!
//! 1. Cancel every resting order, oldest first
//! 2. Time-to-horizon and reservation price
//! 3. Volatility regime on the reservation-price window (scales gamma and k)
//! 4. Mark-to-market and drawdown guard; stop here while paused
//! 5. Forced unwind if inventory sat at the cap too long; stop here if so
//! 6. Quote both sides within the inventory cap

use std::collections::BTreeMap;

use asmm_core::{
    BookEvent, MarketUpdate, Order, OrderId, OrderOutcome, OrderSide, OrderStatus, Price, Size,
    TimeInForce, Trade,
};
use asmm_executor::Venue;
use asmm_risk::{DrawdownGuard, InventoryHoldTimer, RiskTransition};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backtest::{BacktestResult, EquityPoint};
use crate::config::{BookTracking, StrategyConfig};
use crate::error::MmResult;
use crate::inventory::InventoryManager;
use crate::quote_engine::{compute_quotes, reservation_price, time_to_horizon, QuotePair, QuoteParams};
use crate::volatility::ReturnVolatilityTracker;

// ============================================================================
// Events and snapshots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyEventKind {
    HighVolatility,
    DrawdownPause,
    ResumeTrading,
    ForcedUnwind,
}

/// Structured event log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyEvent {
    pub time: u64,
    #[serde(rename = "event")]
    pub kind: StrategyEventKind,
}

/// What a re-quote cycle ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleAction {
    Quoted,
    Paused,
    ForcedUnwind,
    /// Quote prices fell outside the decimal range.
    Skipped,
}

/// State of one re-quote cycle, taken at mark-to-market time (before any
/// order of the cycle is submitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub time: u64,
    pub best_bid: Price,
    pub best_ask: Price,
    pub mid: Price,
    pub reservation_price: Price,
    pub tau: f64,
    pub gamma: f64,
    pub k: f64,
    pub cur_pos: Decimal,
    pub cash: Decimal,
    pub pnl: Decimal,
    pub max_pnl: Decimal,
    pub drawdown: Decimal,
    pub paused: bool,
    pub quotes: Option<QuotePair>,
    pub action: CycleAction,
}

// ============================================================================
// Strategy
// ============================================================================

pub struct Strategy {
    config: StrategyConfig,
    inventory: InventoryManager,
    drawdown: DrawdownGuard,
    hold_timer: InventoryHoldTimer,
    volatility: ReturnVolatilityTracker,

    best_bid: Option<Price>,
    best_ask: Option<Price>,
    cur_time: u64,
    last_readjust: u64,
    tau: f64,
    /// Active gamma / k (scaled in the high-volatility regime).
    gamma: f64,
    k: f64,
    high_volatility: bool,

    /// Resting order ids mapped to their index in `orders`. Ids are
    /// assigned monotonically, so key order is submission order.
    resting: BTreeMap<OrderId, usize>,

    trades: Vec<Trade>,
    market_updates: Vec<MarketUpdate>,
    book_events: Vec<BookEvent>,
    orders: Vec<Order>,
    events: Vec<StrategyEvent>,
    cycles: Vec<CycleSnapshot>,
    equity: Vec<EquityPoint>,
}

impl Strategy {
    /// Validate the configuration and build an idle strategy.
    pub fn new(config: StrategyConfig) -> MmResult<Self> {
        config.validate()?;
        let drawdown = DrawdownGuard::new(config.max_drawdown, config.pause_duration)?;
        let hold_timer = InventoryHoldTimer::new(config.max_inventory, config.max_hold_steps)?;
        let volatility = ReturnVolatilityTracker::new(config.vol_window);

        Ok(Self {
            gamma: config.gamma,
            k: config.k,
            config,
            inventory: InventoryManager::new(),
            drawdown,
            hold_timer,
            volatility,
            best_bid: None,
            best_ask: None,
            cur_time: 0,
            last_readjust: 0,
            tau: 1.0,
            high_volatility: false,
            resting: BTreeMap::new(),
            trades: Vec::new(),
            market_updates: Vec::new(),
            book_events: Vec::new(),
            orders: Vec::new(),
            events: Vec::new(),
            cycles: Vec::new(),
            equity: Vec::new(),
        })
    }

    /// Step the venue until its feed is exhausted and return the histories.
    pub fn run<V: Venue>(mut self, venue: &mut V) -> BacktestResult {
        while self.step(venue) {}
        debug!(
            steps = self.cur_time,
            orders = self.orders.len(),
            trades = self.trades.len(),
            position = %self.inventory.position(),
            "Backtest finished"
        );
        self.into_result()
    }

    /// Process one step. Returns `false` once the feed is exhausted.
    pub fn step<V: Venue>(&mut self, venue: &mut V) -> bool {
        let (time, updates) = venue.tick();
        let Some(updates) = updates else {
            return false;
        };
        self.cur_time = time;

        for update in updates {
            self.absorb(update);
        }

        if time.saturating_sub(self.last_readjust) > self.config.adjust_delay {
            self.last_readjust = time;
            self.requote(venue);
        }
        self.mark_step();
        true
    }

    /// Inventory and PnL at the last price of the step.
    fn mark_step(&mut self) {
        let Some(price) = self.market_updates.last().map(|u| u.price) else {
            return;
        };
        self.equity.push(EquityPoint {
            time: self.cur_time,
            price,
            position: self.inventory.position(),
            cash: self.inventory.cash(),
            pnl: self.inventory.mark_to_market(price),
        });
    }

    fn absorb(&mut self, update: MarketUpdate) {
        match self.config.book_tracking {
            BookTracking::SinceInception => {
                self.best_bid = Some(self.best_bid.map_or(update.bid_price, |b| b.max(update.bid_price)));
                self.best_ask = Some(self.best_ask.map_or(update.ask_price, |a| a.min(update.ask_price)));
            }
            BookTracking::Latest => {
                self.best_bid = Some(update.bid_price);
                self.best_ask = Some(update.ask_price);
            }
        }
        self.book_events.push(BookEvent::MarketUpdate(update.clone()));
        self.market_updates.push(update);
    }

    fn requote<V: Venue>(&mut self, venue: &mut V) {
        let now = self.cur_time;

        while let Some((order_id, index)) = self.resting.pop_first() {
            venue.cancel_order(now, order_id);
            if let Some(order) = self.orders.get_mut(index) {
                order.status = OrderStatus::Cancelled;
            }
        }

        let (t_min, t_max) = venue.horizon();
        self.tau = time_to_horizon(now, t_min, t_max, self.config.terminal_time);

        let (Some(best_bid), Some(best_ask)) = (self.best_bid, self.best_ask) else {
            return;
        };
        let Some(mid) = Price::midpoint(best_bid, best_ask) else {
            warn!(time = now, best_bid = %best_bid, best_ask = %best_ask, "Mid out of range, skipping cycle");
            return;
        };
        let position = self.inventory.position();

        let Some(reservation) = reservation_price(
            mid,
            position,
            self.config.min_order_size,
            self.gamma,
            self.config.sigma,
            self.tau,
        ) else {
            warn!(time = now, mid = %mid, position = %position, "Reservation price out of range, skipping cycle");
            return;
        };

        self.update_volatility_regime(reservation);

        let cash = self.inventory.cash();
        let Some(pnl) = self.inventory.mark_to_market(reservation) else {
            warn!(time = now, reservation = %reservation, position = %position, "PnL out of range, skipping cycle");
            return;
        };
        match self.drawdown.evaluate(now, pnl) {
            Some(RiskTransition::Paused { .. }) => self.emit(StrategyEventKind::DrawdownPause),
            Some(RiskTransition::Resumed { .. }) => self.emit(StrategyEventKind::ResumeTrading),
            None => {}
        }

        let mut snapshot = CycleSnapshot {
            time: now,
            best_bid,
            best_ask,
            mid,
            reservation_price: reservation,
            tau: self.tau,
            gamma: self.gamma,
            k: self.k,
            cur_pos: position,
            cash,
            pnl,
            max_pnl: self.drawdown.max_pnl(),
            drawdown: self.drawdown.drawdown(),
            paused: self.drawdown.is_paused(),
            quotes: None,
            action: CycleAction::Paused,
        };

        if self.drawdown.is_paused() {
            debug!(time = now, state = ?self.drawdown.state(), "Paused, no quotes");
            self.cycles.push(snapshot);
            return;
        }

        if !position.is_zero() && self.hold_timer.is_expired(now) {
            self.forced_unwind(venue, position, reservation);
            snapshot.action = CycleAction::ForcedUnwind;
            self.cycles.push(snapshot);
            return;
        }

        let params = QuoteParams {
            gamma: self.gamma,
            k: self.k,
            sigma: self.config.sigma,
            tau: self.tau,
            inventory_penalty: self.config.inventory_penalty,
            precision: self.config.precision,
        };
        let Some(quotes) = compute_quotes(reservation, position, &params) else {
            warn!(time = now, reservation = %reservation, "Quotes out of range, skipping cycle");
            snapshot.action = CycleAction::Skipped;
            self.cycles.push(snapshot);
            return;
        };

        debug!(
            time = now,
            bid = %quotes.bid,
            ask = %quotes.ask,
            reservation = %reservation,
            position = %position,
            tau = self.tau,
            "Quoting"
        );

        let max_inventory = self.config.max_inventory;
        let position = self.inventory.position();
        if position < max_inventory {
            let size = self.config.order_size.min(max_inventory.saturating_sub(position));
            self.submit(venue, OrderSide::Bid, Size::new(size), quotes.bid, TimeInForce::GoodTilCancelled);
        }
        let position = self.inventory.position();
        if position > -max_inventory {
            let size = self.config.order_size.min(max_inventory.saturating_add(position));
            self.submit(venue, OrderSide::Ask, Size::new(size), quotes.ask, TimeInForce::GoodTilCancelled);
        }

        snapshot.quotes = Some(quotes);
        snapshot.action = CycleAction::Quoted;
        self.cycles.push(snapshot);
    }

    /// Scale gamma and k while the reservation-price window is volatile.
    fn update_volatility_regime(&mut self, reservation: Price) {
        self.volatility.push(reservation.to_f64());
        let Some(vol) = self.volatility.realized_volatility() else {
            return;
        };

        let elevated = vol > self.config.vol_threshold;
        if elevated {
            self.gamma = self.config.gamma * self.config.vol_multiplier;
            self.k = self.config.k * self.config.vol_multiplier;
            if !self.high_volatility {
                info!(time = self.cur_time, vol, gamma = self.gamma, k = self.k, "High volatility regime");
                self.emit(StrategyEventKind::HighVolatility);
            }
        } else {
            if self.high_volatility {
                debug!(time = self.cur_time, vol, "Volatility back to baseline");
            }
            self.gamma = self.config.gamma;
            self.k = self.config.k;
        }
        self.high_volatility = elevated;
    }

    /// One IOC order for the whole position at the rounded reservation price.
    fn forced_unwind<V: Venue>(&mut self, venue: &mut V, position: Decimal, reservation: Price) {
        let held = if position > Decimal::ZERO {
            OrderSide::Bid
        } else {
            OrderSide::Ask
        };
        let side = held.opposite();
        let price = reservation.round_dp(self.config.precision);
        info!(
            time = self.cur_time,
            position = %position,
            side = %side,
            price = %price,
            held_since = ?self.hold_timer.at_cap_since(),
            "Forced unwind"
        );
        self.emit(StrategyEventKind::ForcedUnwind);
        self.submit(venue, side, Size::new(position.abs()), price, TimeInForce::ImmediateOrCancel);
    }

    fn submit<V: Venue>(
        &mut self,
        venue: &mut V,
        side: OrderSide,
        size: Size,
        price: Price,
        tif: TimeInForce,
    ) {
        if !self.inventory.can_absorb(side, price, size) {
            warn!(time = self.cur_time, side = %side, price = %price, size = %size, "Order notional out of range, not submitted");
            return;
        }
        let outcome = venue.place_order_with_tif(self.cur_time, size, side, price, tif);
        let order_id = outcome.order_id();
        match outcome {
            OrderOutcome::Filled(trade) => {
                let ts = trade.ts;
                let status = if self.on_trade(trade) {
                    OrderStatus::Filled
                } else {
                    OrderStatus::Cancelled
                };
                self.orders.push(Order {
                    order_id,
                    ts,
                    side,
                    size,
                    price,
                    tif,
                    status,
                });
            }
            OrderOutcome::Resting(order) => {
                self.resting.insert(order_id, self.orders.len());
                self.orders.push(order.clone());
                self.book_events.push(BookEvent::RestingOrder(order));
            }
        }
    }

    /// Book a fill. A fill the ledger cannot represent is dropped and
    /// reported as `false`.
    fn on_trade(&mut self, trade: Trade) -> bool {
        if !self.inventory.record_fill(&trade) {
            warn!(order_id = %trade.order_id, price = %trade.price, size = %trade.size, "Fill out of range, dropped");
            return false;
        }
        self.hold_timer.on_position(self.cur_time, self.inventory.position());
        debug!(
            order_id = %trade.order_id,
            side = %trade.side,
            price = %trade.price,
            size = %trade.size,
            kind = ?trade.fill_kind,
            position = %self.inventory.position(),
            "Fill"
        );
        self.book_events.push(BookEvent::Trade(trade.clone()));
        self.trades.push(trade);
        true
    }

    fn emit(&mut self, kind: StrategyEventKind) {
        self.events.push(StrategyEvent {
            time: self.cur_time,
            kind,
        });
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.best_bid
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.best_ask
    }

    pub fn position(&self) -> Decimal {
        self.inventory.position()
    }

    pub fn cash(&self) -> Decimal {
        self.inventory.cash()
    }

    pub fn inventory(&self) -> &InventoryManager {
        &self.inventory
    }

    /// PnL at the last re-quote cycle.
    pub fn pnl(&self) -> Decimal {
        self.drawdown.pnl()
    }

    /// Active (gamma, k).
    pub fn risk_params(&self) -> (f64, f64) {
        (self.gamma, self.k)
    }

    pub fn events(&self) -> &[StrategyEvent] {
        &self.events
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn resting_order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.resting.keys().copied()
    }

    fn into_result(self) -> BacktestResult {
        let final_pnl = match self.equity.last() {
            Some(point) => point.pnl.unwrap_or_else(|| {
                warn!(time = point.time, "Final PnL out of range, using last cycle PnL");
                self.drawdown.pnl()
            }),
            None => self.inventory.cash(),
        };

        BacktestResult {
            steps: self.cur_time,
            final_position: self.inventory.position(),
            final_cash: self.inventory.cash(),
            final_pnl,
            realized_pnl: self.inventory.realized_pnl(),
            avg_entry: self.inventory.avg_entry(),
            volume: self.inventory.volume(),
            max_drawdown: self.drawdown.worst_drawdown(),
            trades: self.trades,
            market_updates: self.market_updates,
            book_events: self.book_events,
            orders: self.orders,
            events: self.events,
            cycles: self.cycles,
            equity: self.equity,
        }
    }
}
