//! Trading surface seen by the strategy.

use asmm_core::{MarketUpdate, OrderId, OrderOutcome, OrderSide, Price, Size, TimeInForce};

/// A venue the strategy can step and trade against.
///
/// Implemented by [`crate::Simulator`]; tests substitute scripted venues.
/// None of these calls fail: unfilled orders rest, unknown cancels are
/// ignored.
pub trait Venue {
    /// Advance one step.
    ///
    /// Returns the new step number and the updates for that step, or `None`
    /// once the feed is exhausted.
    fn tick(&mut self) -> (u64, Option<Vec<MarketUpdate>>);

    /// Submit an order with an explicit time-in-force.
    fn place_order_with_tif(
        &mut self,
        ts: u64,
        size: Size,
        side: OrderSide,
        price: Price,
        tif: TimeInForce,
    ) -> OrderOutcome;

    /// Remove a resting order. Unknown or already resolved ids are a no-op.
    fn cancel_order(&mut self, ts: u64, order_id: OrderId);

    /// First and last step numbers of the run, `(t_min, t_max)`.
    fn horizon(&self) -> (u64, u64);

    /// Submit a good-til-cancelled limit order.
    fn place_order(&mut self, ts: u64, size: Size, side: OrderSide, price: Price) -> OrderOutcome {
        self.place_order_with_tif(ts, size, side, price, TimeInForce::GoodTilCancelled)
    }
}
