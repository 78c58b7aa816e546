//! Market data feeds for the ASMM backtester.
//!
//! A feed is materialized in full before a run starts and is read-only
//! afterwards. Two sources exist:
//! - synthetic: Gaussian random walk around a start price
//! - historical: OHLCV bars, of which only `{timestamp, close}` is used

pub mod bar;
pub mod config;
pub mod error;
pub mod feed;

pub use bar::OhlcvBar;
pub use config::SyntheticFeedConfig;
pub use error::{FeedError, FeedResult};
pub use feed::MarketDataFeed;
