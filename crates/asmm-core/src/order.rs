//! Order-related types and identifiers.
//!
//! Provides order side, time-in-force, status, and the simulator-assigned
//! order id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: bid (buy) or ask (sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Bid,
    Ask,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }

    /// Signed quantity: positive for bids, negative for asks.
    pub fn signed(&self, qty: Decimal) -> Decimal {
        match self {
            Self::Bid => qty,
            Self::Ask => -qty,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Ask => write!(f, "ASK"),
        }
    }
}

/// Time-in-force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-til-cancelled. Quotes use this and go through the fill model.
    #[default]
    #[serde(rename = "Gtc")]
    GoodTilCancelled,
    /// Immediate-or-cancel. Executes at the limit price on submission.
    #[serde(rename = "Ioc")]
    ImmediateOrCancel,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoodTilCancelled => write!(f, "Gtc"),
            Self::ImmediateOrCancel => write!(f, "Ioc"),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Resting,
    Filled,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resting => write!(f, "resting"),
            Self::Filled => write!(f, "filled"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Order id assigned by the simulator.
///
/// Ids are handed out from a monotonically increasing counter and are
/// never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The id that follows this one.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_side_opposite() {
        assert_eq!(OrderSide::Bid.opposite(), OrderSide::Ask);
        assert_eq!(OrderSide::Ask.opposite(), OrderSide::Bid);
    }

    #[test]
    fn test_order_side_signed() {
        assert_eq!(OrderSide::Bid.signed(dec!(2)), dec!(2));
        assert_eq!(OrderSide::Ask.signed(dec!(2)), dec!(-2));
    }

    #[test]
    fn test_order_side_serde() {
        assert_eq!(serde_json::to_string(&OrderSide::Bid).unwrap(), "\"BID\"");
        let side: OrderSide = serde_json::from_str("\"ASK\"").unwrap();
        assert_eq!(side, OrderSide::Ask);
    }

    #[test]
    fn test_order_id_next() {
        let id = OrderId::new(7);
        assert_eq!(id.next(), OrderId::new(8));
        assert!(id < id.next());
    }
}
