//! Tick-replay simulator.
//!
//! Replays a pre-materialized feed one step at a time and resolves each
//! submitted order immediately: GTC orders go through the execution model,
//! IOC orders execute at their limit price. Orders that do not fill rest
//! until cancelled.
//!
//! Step numbering: the first `tick()` returns step 1. At step 1 there is no
//! price history yet, so every order rests.

use std::collections::BTreeMap;

use asmm_core::{
    FillKind, MarketUpdate, Order, OrderId, OrderOutcome, OrderSide, OrderStatus, Price, Size,
    TimeInForce, Trade,
};
use asmm_feed::MarketDataFeed;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::config::ExecutionConfig;
use crate::error::ExecutorResult;
use crate::model::{ExecutionModel, FillDecision, FillInputs};
use crate::venue::Venue;

/// Single-asset tick-replay simulator.
///
/// Owns the feed, the execution model and the random source. Holds a shadow
/// copy of each resting order until it is cancelled.
#[derive(Debug)]
pub struct Simulator<R> {
    feed: MarketDataFeed,
    model: ExecutionModel,
    rng: R,
    /// Number of ticks delivered so far.
    cursor: usize,
    next_order_id: OrderId,
    resting: BTreeMap<OrderId, Order>,
}

impl<R: Rng> Simulator<R> {
    pub fn new(feed: MarketDataFeed, config: ExecutionConfig, rng: R) -> ExecutorResult<Self> {
        config.validate()?;
        Ok(Self {
            feed,
            model: ExecutionModel::new(config),
            rng,
            cursor: 0,
            next_order_id: OrderId::new(1),
            resting: BTreeMap::new(),
        })
    }

    pub fn feed(&self) -> &MarketDataFeed {
        &self.feed
    }

    /// Current step (0 before the first tick).
    pub fn step(&self) -> u64 {
        self.cursor as u64
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.feed.len()
    }

    /// Resting orders, oldest first.
    pub fn resting_orders(&self) -> impl Iterator<Item = &Order> {
        self.resting.values()
    }

    fn allocate_order_id(&mut self) -> OrderId {
        let id = self.next_order_id;
        self.next_order_id = id.next();
        id
    }

    /// Fill-model inputs for an order against the current tick.
    fn fill_inputs(
        &self,
        current: &MarketUpdate,
        next: &MarketUpdate,
        side: OrderSide,
        size: Size,
        price: Price,
    ) -> FillInputs {
        // Gaps in f64: a quote may sit anywhere in the decimal range.
        let mid = current.price.to_f64();
        let px = price.to_f64();
        let passive_gap = match side {
            OrderSide::Bid => mid - px,
            OrderSide::Ask => px - mid,
        };
        let price_distance = if mid > 0.0 {
            passive_gap.max(0.0) / mid
        } else {
            0.0
        };

        let at_touch = match side {
            OrderSide::Bid => price >= current.bid_price,
            OrderSide::Ask => price <= current.ask_price,
        };
        let queue_position_ratio = if at_touch {
            0.0
        } else {
            let width = current.spread();
            if width > 0.0 {
                let gap = match side {
                    OrderSide::Bid => current.bid_price.to_f64() - px,
                    OrderSide::Ask => px - current.ask_price.to_f64(),
                };
                (gap / width).min(1.0)
            } else {
                1.0
            }
        };

        let order_size_ratio = match (size.inner().to_f64(), self.model.config().reference_depth.to_f64()) {
            (Some(size), Some(depth)) if depth > 0.0 => size / depth,
            _ => 0.0,
        };

        FillInputs {
            side,
            queue_position_ratio,
            price_distance,
            price_movement: next.price.to_f64() - current.price.to_f64(),
            order_size_ratio,
        }
    }

    fn rest(&mut self, order: Order) -> OrderOutcome {
        debug!(order_id = %order.order_id, side = %order.side, price = %order.price, size = %order.size, "Order resting");
        self.resting.insert(order.order_id, order.clone());
        OrderOutcome::Resting(order)
    }
}

impl<R: Rng> Venue for Simulator<R> {
    fn tick(&mut self) -> (u64, Option<Vec<MarketUpdate>>) {
        match self.feed.get(self.cursor) {
            Some(update) => {
                let update = update.clone();
                self.cursor += 1;
                (self.cursor as u64, Some(vec![update]))
            }
            None => (self.cursor as u64, None),
        }
    }

    fn place_order_with_tif(
        &mut self,
        ts: u64,
        size: Size,
        side: OrderSide,
        price: Price,
        tif: TimeInForce,
    ) -> OrderOutcome {
        let order_id = self.allocate_order_id();
        let order = Order {
            order_id,
            ts,
            side,
            size,
            price,
            tif,
            status: OrderStatus::Resting,
        };

        if self.cursor <= 1 {
            return self.rest(order);
        }

        let trade = |price: Price, fill_kind: FillKind| Trade {
            order_id,
            ts,
            side,
            size,
            price,
            fill_kind,
        };

        if tif == TimeInForce::ImmediateOrCancel {
            debug!(order_id = %order_id, side = %side, price = %price, size = %size, "IOC executed");
            return OrderOutcome::Filled(trade(price, FillKind::Immediate));
        }

        let Some(current) = self.feed.get(self.cursor - 1).cloned() else {
            return self.rest(order);
        };
        let next = self.feed.get(self.cursor).cloned().unwrap_or_else(|| current.clone());
        let inputs = self.fill_inputs(&current, &next, side, size, price);
        let next_price = next.price;

        match self.model.decide(&inputs, &mut self.rng) {
            FillDecision::Filled => {
                debug!(order_id = %order_id, side = %side, price = %price, size = %size, "Order filled");
                OrderOutcome::Filled(trade(price, FillKind::Maker))
            }
            FillDecision::Slippage => {
                debug!(order_id = %order_id, side = %side, requested = %price, executed = %next_price, "Order slipped");
                OrderOutcome::Filled(trade(next_price, FillKind::Slippage))
            }
            FillDecision::NotFilled => self.rest(order),
        }
    }

    fn cancel_order(&mut self, ts: u64, order_id: OrderId) {
        if self.resting.remove(&order_id).is_some() {
            debug!(ts, order_id = %order_id, "Order cancelled");
        }
    }

    fn horizon(&self) -> (u64, u64) {
        (1, self.feed.len() as u64)
    }
}
