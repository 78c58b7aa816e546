//! Tick and order records exchanged between feed, simulator and strategy.
//!
//! `OrderOutcome` and `BookEvent` are closed variants: a submitted order is
//! either a trade or a resting order.

use serde::{Deserialize, Serialize};

use crate::order::{OrderId, OrderSide, OrderStatus, TimeInForce};
use crate::{Price, Size};

/// A single market-data tick.
///
/// Immutable once produced by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketUpdate {
    /// Receive timestamp (step index for synthetic feeds, Unix ms for
    /// historical ones).
    pub receive_ts: i64,
    /// Last / reference price.
    pub price: Price,
    /// Touch bid.
    pub bid_price: Price,
    /// Touch ask.
    pub ask_price: Price,
}

impl MarketUpdate {
    pub fn new(receive_ts: i64, price: Price, bid_price: Price, ask_price: Price) -> Self {
        Self {
            receive_ts,
            price,
            bid_price,
            ask_price,
        }
    }

    /// Touch width (ask - bid) for model math.
    pub fn spread(&self) -> f64 {
        self.ask_price.to_f64() - self.bid_price.to_f64()
    }
}

/// An order as submitted by the strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    /// Step at which the order was submitted.
    pub ts: u64,
    pub side: OrderSide,
    pub size: Size,
    /// Limit price.
    pub price: Price,
    pub tif: TimeInForce,
    pub status: OrderStatus,
}

/// How a trade came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillKind {
    /// Passive fill at the requested price.
    Maker,
    /// Executed at the next mid instead of the requested price.
    Slippage,
    /// Immediate-or-cancel execution at the limit price.
    Immediate,
}

/// An own trade. Produced at most once per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub order_id: OrderId,
    pub ts: u64,
    pub side: OrderSide,
    pub size: Size,
    /// Execution price.
    pub price: Price,
    pub fill_kind: FillKind,
}

impl Trade {
    /// Signed size: positive for bids, negative for asks.
    pub fn signed_size(&self) -> rust_decimal::Decimal {
        self.side.signed(self.size.inner())
    }
}

/// Result of submitting an order to the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// Executed immediately.
    Filled(Trade),
    /// Accepted into the resting set.
    Resting(Order),
}

impl OrderOutcome {
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::Filled(trade) => trade.order_id,
            Self::Resting(order) => order.order_id,
        }
    }
}

/// One entry of the book-update history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookEvent {
    MarketUpdate(MarketUpdate),
    RestingOrder(Order),
    Trade(Trade),
}
