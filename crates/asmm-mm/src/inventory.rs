//! Inventory tracking for market making.
//!
//! Single-asset ledger: net position, cash, average entry and realized PnL.
//! Updated only from own trades. Every balance is checked; a fill that would
//! overflow one is refused as a whole.

use asmm_core::{OrderSide, Price, Size, Trade};
use rust_decimal::prelude::Signed;
use rust_decimal::Decimal;

/// Position and cash ledger.
#[derive(Debug, Clone, Default)]
pub struct InventoryManager {
    /// Net position size (positive = long, negative = short).
    net_size: Decimal,
    /// Negative of the sum of `price * signed size` over all fills.
    cash: Decimal,
    /// Average entry price of current inventory.
    avg_entry: Decimal,
    /// Realized PnL from position reductions.
    realized_pnl: Decimal,
    /// Sum of absolute filled size.
    volume: Decimal,
}

impl InventoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fill and update position, cash and entry price.
    ///
    /// Returns `false` and leaves the ledger untouched if any balance would
    /// leave the decimal range.
    pub fn record_fill(&mut self, trade: &Trade) -> bool {
        match self.applied(trade.side, trade.price, trade.size.inner()) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    /// Whether a fill of `size` at `price` would fit the ledger.
    pub fn can_absorb(&self, side: OrderSide, price: Price, size: Size) -> bool {
        self.applied(side, price, size.inner()).is_some()
    }

    fn applied(&self, side: OrderSide, price: Price, fill_size: Decimal) -> Option<Self> {
        let fill_price = price.inner();
        let signed_size = side.signed(fill_size);

        let old_size = self.net_size;
        let new_size = old_size.checked_add(signed_size)?;

        // Reducing position: realize PnL on the overlapping amount
        let mut realized_pnl = self.realized_pnl;
        if (old_size > Decimal::ZERO && signed_size < Decimal::ZERO)
            || (old_size < Decimal::ZERO && signed_size > Decimal::ZERO)
        {
            let reduce_amount = signed_size.abs().min(old_size.abs());
            let edge = if old_size > Decimal::ZERO {
                fill_price.checked_sub(self.avg_entry)?
            } else {
                self.avg_entry.checked_sub(fill_price)?
            };
            realized_pnl = realized_pnl.checked_add(edge.checked_mul(reduce_amount)?)?;
        }

        let avg_entry = if new_size.is_zero() {
            Decimal::ZERO
        } else if new_size.signum() != old_size.signum() && !old_size.is_zero() {
            // Flipped through zero
            fill_price
        } else if new_size.signum() == signed_size.signum() || old_size.is_zero() {
            let old_notional = old_size.abs().checked_mul(self.avg_entry)?;
            let new_notional = fill_size.checked_mul(fill_price)?;
            old_notional.checked_add(new_notional)?.checked_div(new_size.abs())?
        } else {
            self.avg_entry
        };

        Some(Self {
            net_size: new_size,
            cash: self.cash.checked_sub(fill_price.checked_mul(signed_size)?)?,
            avg_entry,
            realized_pnl,
            volume: self.volume.checked_add(fill_size)?,
        })
    }

    pub fn position(&self) -> Decimal {
        self.net_size
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn avg_entry(&self) -> Decimal {
        self.avg_entry
    }

    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    /// `cash + position * mark`, `None` on overflow.
    pub fn mark_to_market(&self, mark: Price) -> Option<Decimal> {
        self.net_size
            .checked_mul(mark.inner())
            .and_then(|value| self.cash.checked_add(value))
    }
}
