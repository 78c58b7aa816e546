//! End-to-end scenarios and run-wide properties.
//!
//! Scenario A drives the real simulator on a flat synthetic feed. Scenarios
//! B and C use a scripted venue so that fills are deterministic. The
//! property tests run the real simulator over seeded random-walk feeds.

use asmm_core::{
    FillKind, MarketUpdate, Order, OrderId, OrderOutcome, OrderSide, OrderStatus, Price, Size,
    TimeInForce, Trade,
};
use asmm_executor::{ExecutionConfig, Simulator, Venue};
use asmm_feed::{MarketDataFeed, SyntheticFeedConfig};
use asmm_mm::{
    BacktestResult, CycleAction, Strategy, StrategyConfig, StrategyEvent, StrategyEventKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Helpers
// ============================================================================

/// Venue over a fixed price path. Fills every bid (optionally) and every
/// IOC at the limit price, rests everything else.
struct ScriptedVenue {
    prices: Vec<Decimal>,
    cursor: usize,
    next_id: u64,
    fill_bids: bool,
}

impl ScriptedVenue {
    fn new(prices: Vec<Decimal>, fill_bids: bool) -> Self {
        Self {
            prices,
            cursor: 0,
            next_id: 1,
            fill_bids,
        }
    }
}

impl Venue for ScriptedVenue {
    fn tick(&mut self) -> (u64, Option<Vec<MarketUpdate>>) {
        let Some(p) = self.prices.get(self.cursor).copied() else {
            return (self.cursor as u64, None);
        };
        self.cursor += 1;
        let update = MarketUpdate::new(
            self.cursor as i64,
            Price::new(p),
            Price::new(p - dec!(0.5)),
            Price::new(p + dec!(0.5)),
        );
        (self.cursor as u64, Some(vec![update]))
    }

    fn place_order_with_tif(
        &mut self,
        ts: u64,
        size: Size,
        side: OrderSide,
        price: Price,
        tif: TimeInForce,
    ) -> OrderOutcome {
        let order_id = OrderId::new(self.next_id);
        self.next_id += 1;
        let fill_kind = match tif {
            TimeInForce::ImmediateOrCancel => Some(FillKind::Immediate),
            TimeInForce::GoodTilCancelled if self.fill_bids && side == OrderSide::Bid => {
                Some(FillKind::Maker)
            }
            TimeInForce::GoodTilCancelled => None,
        };
        match fill_kind {
            Some(fill_kind) => OrderOutcome::Filled(Trade {
                order_id,
                ts,
                side,
                size,
                price,
                fill_kind,
            }),
            None => OrderOutcome::Resting(Order {
                order_id,
                ts,
                side,
                size,
                price,
                tif,
                status: OrderStatus::Resting,
            }),
        }
    }

    fn cancel_order(&mut self, _ts: u64, _order_id: OrderId) {}

    fn horizon(&self) -> (u64, u64) {
        (1, self.prices.len() as u64)
    }
}

fn simulator(feed_config: &SyntheticFeedConfig, seed: u64) -> Simulator<ChaCha8Rng> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let feed = MarketDataFeed::synthetic(feed_config, &mut rng).unwrap();
    Simulator::new(feed, ExecutionConfig::default(), rng).unwrap()
}

fn scenario_a(seed: u64) -> BacktestResult {
    let feed_config = SyntheticFeedConfig {
        steps: 5,
        start_price: dec!(100),
        sigma: 0.0,
        ..Default::default()
    };
    let config = StrategyConfig {
        gamma: 0.05,
        k: 1.5,
        sigma: 0.0,
        adjust_delay: 1,
        ..Default::default()
    };
    let mut sim = simulator(&feed_config, seed);
    Strategy::new(config).unwrap().run(&mut sim)
}

fn times_of(events: &[StrategyEvent], kind: StrategyEventKind) -> Vec<u64> {
    events
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.time)
        .collect()
}

/// Configuration tight enough to trip pauses and unwinds on a noisy feed.
fn stressed_config() -> StrategyConfig {
    StrategyConfig {
        adjust_delay: 0,
        max_inventory: dec!(2),
        max_hold_steps: 3,
        max_drawdown: dec!(0.5),
        pause_duration: 5,
        vol_window: 5,
        ..Default::default()
    }
}

fn noisy_feed() -> SyntheticFeedConfig {
    SyntheticFeedConfig {
        steps: 300,
        sigma: 0.5,
        ..Default::default()
    }
}

// ============================================================================
// Scenario A: zero volatility, real simulator
// ============================================================================

#[test]
fn test_scenario_a_symmetric_quotes() {
    let result = scenario_a(42);

    let times: Vec<u64> = result.cycles.iter().map(|c| c.time).collect();
    assert_eq!(times, vec![2, 4]);

    for cycle in &result.cycles {
        assert_eq!(cycle.mid.inner(), dec!(100));
        assert_eq!(cycle.reservation_price.inner(), dec!(100));
        assert_eq!(cycle.action, CycleAction::Quoted);
        let quotes = cycle.quotes.as_ref().unwrap();
        assert_eq!(quotes.bid.inner(), dec!(99.34));
        assert_eq!(quotes.ask.inner(), dec!(100.66));
        assert_eq!(
            dec!(100) - quotes.bid.inner(),
            quotes.ask.inner() - dec!(100)
        );
    }

    // Every trade is at a quoted price or at the (flat) next mid.
    for trade in &result.trades {
        let p = trade.price.inner();
        assert!(p == dec!(99.34) || p == dec!(100.66) || p == dec!(100));
    }
    assert_eq!(result.market_updates.len(), 5);
}

#[test]
fn test_scenario_a_deterministic_for_seed() {
    let a = scenario_a(7);
    let b = scenario_a(7);
    assert_eq!(a.trades, b.trades);
    assert_eq!(a.orders, b.orders);
    assert_eq!(a.book_events, b.book_events);
    assert_eq!(a.final_position, b.final_position);
}

// ============================================================================
// Scenario B: rising mid, every bid fills
// ============================================================================

#[test]
fn test_scenario_b_inventory_saturates_at_cap() {
    let prices: Vec<Decimal> = (0..40).map(|i| dec!(100) + Decimal::from(i)).collect();
    let config = StrategyConfig {
        max_inventory: dec!(5),
        max_hold_steps: 1_000,
        ..Default::default()
    };
    let mut venue = ScriptedVenue::new(prices, true);
    let mut strategy = Strategy::new(config).unwrap();

    while strategy.step(&mut venue) {
        assert!(strategy.position() <= dec!(5));
    }
    assert_eq!(strategy.position(), dec!(5));

    let result = strategy.run(&mut venue);
    assert_eq!(result.final_position, dec!(5));
    assert_eq!(result.trades.len(), 5);
    assert!(result.trades.iter().all(|t| t.side == OrderSide::Bid));
}

// ============================================================================
// Scenario C: adverse jump beyond the drawdown ceiling
// ============================================================================

fn scenario_c_prices() -> Vec<Decimal> {
    let mut prices = vec![dec!(100); 6];
    prices.extend(vec![dec!(50); 10]);
    prices.extend(vec![dec!(200); 29]);
    prices
}

fn scenario_c_config() -> StrategyConfig {
    StrategyConfig {
        adjust_delay: 0,
        max_drawdown: dec!(50),
        pause_duration: 20,
        max_hold_steps: 30,
        ..Default::default()
    }
}

#[test]
fn test_scenario_c_single_pause_and_no_quotes() {
    let mut venue = ScriptedVenue::new(scenario_c_prices(), true);
    let result = Strategy::new(scenario_c_config()).unwrap().run(&mut venue);

    let pauses = times_of(&result.events, StrategyEventKind::DrawdownPause);
    assert_eq!(pauses, vec![7]);

    let pause_until = 7 + 20;
    assert!(result
        .orders
        .iter()
        .all(|o| o.ts < 7 || o.ts >= pause_until));
    assert!(result
        .cycles
        .iter()
        .filter(|c| (7..pause_until).contains(&c.time))
        .all(|c| c.paused && c.action == CycleAction::Paused && c.quotes.is_none()));
}

#[test]
fn test_scenario_c_resume_after_pause_until() {
    let mut venue = ScriptedVenue::new(scenario_c_prices(), true);
    let result = Strategy::new(scenario_c_config()).unwrap().run(&mut venue);

    let resumes = times_of(&result.events, StrategyEventKind::ResumeTrading);
    assert_eq!(resumes, vec![27]);
    assert!(result.orders.iter().any(|o| o.ts == 27));
}

#[test]
fn test_scenario_c_forced_unwind_flattens() {
    let mut venue = ScriptedVenue::new(scenario_c_prices(), true);
    let result = Strategy::new(scenario_c_config()).unwrap().run(&mut venue);

    // Cap reached at step 5, held through the pause, unwound once
    // 36 - 5 > 30.
    let unwinds = times_of(&result.events, StrategyEventKind::ForcedUnwind);
    assert_eq!(unwinds, vec![36]);

    let unwind_cycle = result.cycles.iter().find(|c| c.time == 36).unwrap();
    assert_eq!(unwind_cycle.action, CycleAction::ForcedUnwind);
    assert_eq!(unwind_cycle.cur_pos, dec!(5));

    let ioc = result
        .trades
        .iter()
        .find(|t| t.fill_kind == FillKind::Immediate)
        .unwrap();
    assert_eq!(ioc.ts, 36);
    assert_eq!(ioc.side, OrderSide::Ask);
    assert_eq!(ioc.size.inner(), dec!(5));
    assert_eq!(ioc.price, unwind_cycle.reservation_price.round_dp(2));

    let next_cycle = result.cycles.iter().find(|c| c.time == 37).unwrap();
    assert_eq!(next_cycle.cur_pos, dec!(0));
}

// ============================================================================
// Run-wide properties
// ============================================================================

#[test]
fn test_position_equals_signed_fill_sum() {
    for seed in 0..5 {
        let mut sim = simulator(&noisy_feed(), seed);
        let result = Strategy::new(stressed_config()).unwrap().run(&mut sim);
        assert_eq!(result.final_position, result.net_traded(), "seed {seed}");

        let cash: Decimal = result
            .trades
            .iter()
            .map(|t| -(t.price.inner() * t.signed_size()))
            .sum();
        assert_eq!(result.final_cash, cash, "seed {seed}");
    }
}

#[test]
fn test_pnl_identity_at_every_cycle() {
    for seed in 0..5 {
        let mut sim = simulator(&noisy_feed(), seed);
        let result = Strategy::new(stressed_config()).unwrap().run(&mut sim);
        for cycle in &result.cycles {
            assert_eq!(
                cycle.pnl,
                cycle.cash + cycle.cur_pos * cycle.reservation_price.inner(),
                "seed {seed}, t {}",
                cycle.time
            );
            assert_eq!(cycle.drawdown, cycle.max_pnl - cycle.pnl);
        }
    }
}

#[test]
fn test_equity_series_marks_each_step_at_tick_price() {
    for seed in 0..3 {
        let mut sim = simulator(&noisy_feed(), seed);
        let result = Strategy::new(stressed_config()).unwrap().run(&mut sim);

        assert_eq!(result.equity.len() as u64, result.steps, "seed {seed}");
        for (point, update) in result.equity.iter().zip(&result.market_updates) {
            assert_eq!(point.price, update.price);
            assert_eq!(point.pnl, Some(point.cash + point.position * point.price.inner()));
        }
        let last = result.equity.last().unwrap();
        assert_eq!(last.position, result.final_position);
        assert_eq!(last.pnl, Some(result.final_pnl));
    }
}

#[test]
fn test_inventory_never_exceeds_cap() {
    for seed in 0..5 {
        let mut sim = simulator(&noisy_feed(), seed);
        let mut strategy = Strategy::new(stressed_config()).unwrap();
        while strategy.step(&mut sim) {
            assert!(strategy.position().abs() <= dec!(2), "seed {seed}");
        }
    }
}

#[test]
fn test_best_prices_tighten_monotonically() {
    for seed in 0..5 {
        let mut sim = simulator(&noisy_feed(), seed);
        let mut strategy = Strategy::new(StrategyConfig::default()).unwrap();
        let mut prev_bid: Option<Price> = None;
        let mut prev_ask: Option<Price> = None;

        while strategy.step(&mut sim) {
            let bid = strategy.best_bid().unwrap();
            let ask = strategy.best_ask().unwrap();
            if let Some(prev) = prev_bid {
                assert!(bid >= prev, "seed {seed}");
            }
            if let Some(prev) = prev_ask {
                assert!(ask <= prev, "seed {seed}");
            }
            prev_bid = Some(bid);
            prev_ask = Some(ask);
        }
    }
}

#[test]
fn test_pause_resume_episodes_pair_up() {
    let config = stressed_config();
    for seed in 0..5 {
        let mut sim = simulator(&noisy_feed(), seed);
        let result = Strategy::new(config.clone()).unwrap().run(&mut sim);

        let episodes: Vec<&StrategyEvent> = result
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    StrategyEventKind::DrawdownPause | StrategyEventKind::ResumeTrading
                )
            })
            .collect();

        // Strict alternation: pause, resume, pause, resume, ...
        for (i, event) in episodes.iter().enumerate() {
            let expected = if i % 2 == 0 {
                StrategyEventKind::DrawdownPause
            } else {
                StrategyEventKind::ResumeTrading
            };
            assert_eq!(event.kind, expected, "seed {seed}");
        }
        for pair in episodes.chunks(2) {
            if let [pause, resume] = pair {
                assert!(resume.time >= pause.time + config.pause_duration, "seed {seed}");
                assert!(result
                    .orders
                    .iter()
                    .all(|o| o.ts < pause.time || o.ts >= resume.time));
            }
        }
    }
}

#[test]
fn test_forced_unwind_only_after_hold_at_cap() {
    let config = stressed_config();
    for seed in 0..5 {
        let mut sim = simulator(&noisy_feed(), seed);
        let result = Strategy::new(config.clone()).unwrap().run(&mut sim);

        for t in times_of(&result.events, StrategyEventKind::ForcedUnwind) {
            // Replay fills before the unwind and find when the cap was
            // last reached.
            let mut position = Decimal::ZERO;
            let mut at_cap_since = None;
            for trade in result.trades.iter().filter(|tr| tr.ts < t) {
                position += trade.signed_size();
                if position.abs() == config.max_inventory {
                    at_cap_since.get_or_insert(trade.ts);
                } else {
                    at_cap_since = None;
                }
            }
            let since = at_cap_since.expect("unwind without position at cap");
            assert!(t - since > config.max_hold_steps, "seed {seed}");

            let cycle = result.cycles.iter().find(|c| c.time == t).unwrap();
            assert_eq!(cycle.cur_pos.abs(), config.max_inventory);

            let unwind = result
                .trades
                .iter()
                .find(|tr| tr.ts == t && tr.fill_kind == FillKind::Immediate)
                .expect("unwind executes on its cycle");
            assert_eq!(position + unwind.signed_size(), Decimal::ZERO, "seed {seed}");
        }
    }
}

#[test]
fn test_cancel_unknown_order_is_noop() {
    let mut sim = simulator(&noisy_feed(), 3);
    sim.tick();
    sim.cancel_order(1, OrderId::new(12345));
    sim.cancel_order(1, OrderId::new(0));
    assert_eq!(sim.resting_orders().count(), 0);
}
