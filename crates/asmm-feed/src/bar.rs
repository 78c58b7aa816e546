//! Historical OHLCV bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a tabular market-data series.
///
/// Values are optional because source data has gaps. Only `timestamp` and
/// `close` feed the backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl OhlcvBar {
    /// Close price if it is usable: present, finite and positive.
    pub fn usable_close(&self) -> Option<f64> {
        self.close.filter(|c| c.is_finite() && *c > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn close_only(close: Option<f64>) -> OhlcvBar {
        OhlcvBar {
            timestamp: Utc.timestamp_millis_opt(0).unwrap(),
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    #[test]
    fn test_usable_close() {
        assert_eq!(close_only(Some(101.5)).usable_close(), Some(101.5));
        assert_eq!(close_only(Some(f64::NAN)).usable_close(), None);
        assert_eq!(close_only(Some(0.0)).usable_close(), None);
        assert_eq!(close_only(None).usable_close(), None);
    }
}
