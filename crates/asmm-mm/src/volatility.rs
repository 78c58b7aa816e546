//! Rolling volatility of the reservation price.
//!
//! Keeps the last `window` reservation prices. Once the window is full the
//! realized volatility is the population standard deviation of the
//! consecutive log returns inside it.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ReturnVolatilityTracker {
    window: usize,
    prices: VecDeque<f64>,
}

impl ReturnVolatilityTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            prices: VecDeque::with_capacity(window + 1),
        }
    }

    /// Append a price, evicting the oldest once the window is full.
    pub fn push(&mut self, price: f64) {
        self.prices.push_back(price);
        while self.prices.len() > self.window {
            self.prices.pop_front();
        }
    }

    pub fn is_full(&self) -> bool {
        self.prices.len() >= self.window
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Population std of log returns, or `None` until the window is full.
    /// Also `None` if any price in the window is not positive.
    pub fn realized_volatility(&self) -> Option<f64> {
        if !self.is_full() || self.window < 2 {
            return None;
        }
        if self.prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return None;
        }

        let returns: Vec<f64> = self
            .prices
            .iter()
            .zip(self.prices.iter().skip(1))
            .map(|(prev, next)| (next / prev).ln())
            .collect();

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_until_full() {
        let mut t = ReturnVolatilityTracker::new(3);
        t.push(100.0);
        t.push(101.0);
        assert!(!t.is_full());
        assert_eq!(t.realized_volatility(), None);
        t.push(102.0);
        assert!(t.realized_volatility().is_some());
    }

    #[test]
    fn test_constant_prices_have_zero_volatility() {
        let mut t = ReturnVolatilityTracker::new(4);
        for _ in 0..10 {
            t.push(100.0);
        }
        assert_eq!(t.len(), 4);
        assert_eq!(t.realized_volatility(), Some(0.0));
    }

    #[test]
    fn test_population_std_of_log_returns() {
        // Returns: ln(1.1), ln(1/1.1) -> mean 0, population std = ln(1.1).
        let mut t = ReturnVolatilityTracker::new(3);
        t.push(100.0);
        t.push(110.0);
        t.push(100.0);
        let vol = t.realized_volatility().unwrap();
        assert!((vol - 1.1f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_window_rolls() {
        let mut t = ReturnVolatilityTracker::new(2);
        t.push(50.0);
        t.push(100.0);
        t.push(100.0);
        assert_eq!(t.realized_volatility(), Some(0.0));
    }

    #[test]
    fn test_non_positive_price_yields_none() {
        let mut t = ReturnVolatilityTracker::new(2);
        t.push(0.0);
        t.push(100.0);
        assert_eq!(t.realized_volatility(), None);
    }
}
