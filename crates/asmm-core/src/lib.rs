//! Core domain types for the ASMM market-making backtester.
//!
//! This crate provides the types shared by the feed, the simulator and the
//! strategy:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `OrderSide`, `TimeInForce`, `OrderId`, `OrderStatus`: Order enums and ids
//! - `MarketUpdate`, `Order`, `Trade`: Tick and order records
//! - `OrderOutcome`, `BookEvent`: Closed variants for fill / no-fill handling

pub mod decimal;
pub mod error;
pub mod order;
pub mod types;

pub use decimal::{Price, Size};
pub use error::{CoreError, CoreResult};
pub use order::{OrderId, OrderSide, OrderStatus, TimeInForce};
pub use types::{BookEvent, FillKind, MarketUpdate, Order, OrderOutcome, Trade};
