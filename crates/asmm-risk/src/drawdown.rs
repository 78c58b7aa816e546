//! Drawdown pause latch.
//!
//! Tracks running-max PnL and pauses quoting when the drawdown from that
//! peak exceeds a ceiling. Unlike a hard stop, the latch releases on its
//! own: once `pause_until` has passed and the drawdown is back under the
//! ceiling, trading resumes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RiskError, RiskResult};

// ============================================================================
// TradingState
// ============================================================================

/// Strategy trading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TradingState {
    /// Quoting permitted.
    Active,
    /// Drawdown breach in effect.
    Paused {
        /// Step at which the breach was detected.
        since: u64,
        /// Earliest step at which trading may resume.
        until: u64,
    },
}

impl TradingState {
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused { .. })
    }
}

/// A state change produced by [`DrawdownGuard::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "transition")]
pub enum RiskTransition {
    Paused {
        time: u64,
        drawdown: Decimal,
        pause_until: u64,
    },
    Resumed {
        time: u64,
        drawdown: Decimal,
    },
}

// ============================================================================
// DrawdownGuard
// ============================================================================

/// Drawdown latch.
///
/// Transitions happen only inside [`DrawdownGuard::evaluate`], which the
/// strategy calls once per re-quote cycle.
#[derive(Debug, Clone)]
pub struct DrawdownGuard {
    max_drawdown: Decimal,
    pause_duration: u64,
    pnl: Decimal,
    max_pnl: Decimal,
    drawdown: Decimal,
    /// Deepest drawdown seen over the run.
    worst_drawdown: Decimal,
    state: TradingState,
}

impl DrawdownGuard {
    /// Create a guard with a positive drawdown ceiling.
    pub fn new(max_drawdown: Decimal, pause_duration: u64) -> RiskResult<Self> {
        if max_drawdown <= Decimal::ZERO {
            return Err(RiskError::ConfigError(format!(
                "max_drawdown must be positive, got {max_drawdown}"
            )));
        }
        Ok(Self {
            max_drawdown,
            pause_duration,
            pnl: Decimal::ZERO,
            max_pnl: Decimal::ZERO,
            drawdown: Decimal::ZERO,
            worst_drawdown: Decimal::ZERO,
            state: TradingState::Active,
        })
    }

    /// Mark-to-market update at step `now`.
    ///
    /// Updates running max and drawdown, then applies at most one
    /// transition:
    /// - ACTIVE and `drawdown > max_drawdown`: pause until `now + pause_duration`
    /// - PAUSED, `now >= pause_until` and `drawdown < max_drawdown`: resume
    pub fn evaluate(&mut self, now: u64, pnl: Decimal) -> Option<RiskTransition> {
        self.pnl = pnl;
        self.max_pnl = self.max_pnl.max(pnl);
        self.drawdown = self.max_pnl.saturating_sub(pnl);
        self.worst_drawdown = self.worst_drawdown.max(self.drawdown);

        match self.state {
            TradingState::Active if self.drawdown > self.max_drawdown => {
                let pause_until = now.saturating_add(self.pause_duration);
                self.state = TradingState::Paused {
                    since: now,
                    until: pause_until,
                };
                info!(
                    time = now,
                    drawdown = %self.drawdown,
                    max_drawdown = %self.max_drawdown,
                    pause_until,
                    "Drawdown ceiling breached, pausing"
                );
                Some(RiskTransition::Paused {
                    time: now,
                    drawdown: self.drawdown,
                    pause_until,
                })
            }
            TradingState::Paused { until, .. }
                if now >= until && self.drawdown < self.max_drawdown =>
            {
                self.state = TradingState::Active;
                info!(time = now, drawdown = %self.drawdown, "Drawdown receded, resuming");
                Some(RiskTransition::Resumed {
                    time: now,
                    drawdown: self.drawdown,
                })
            }
            _ => None,
        }
    }

    pub fn state(&self) -> TradingState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn pnl(&self) -> Decimal {
        self.pnl
    }

    pub fn max_pnl(&self) -> Decimal {
        self.max_pnl
    }

    pub fn drawdown(&self) -> Decimal {
        self.drawdown
    }

    pub fn worst_drawdown(&self) -> Decimal {
        self.worst_drawdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn guard() -> DrawdownGuard {
        DrawdownGuard::new(dec!(10), 5).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_ceiling() {
        assert!(DrawdownGuard::new(dec!(0), 5).is_err());
        assert!(DrawdownGuard::new(dec!(-1), 5).is_err());
    }

    #[test]
    fn test_tracks_running_max() {
        let mut g = guard();
        assert_eq!(g.evaluate(1, dec!(4)), None);
        assert_eq!(g.evaluate(2, dec!(1)), None);
        assert_eq!(g.max_pnl(), dec!(4));
        assert_eq!(g.drawdown(), dec!(3));
        assert_eq!(g.pnl(), dec!(1));
    }

    #[test]
    fn test_drawdown_at_ceiling_does_not_pause() {
        let mut g = guard();
        g.evaluate(1, dec!(10));
        assert_eq!(g.evaluate(2, dec!(0)), None);
        assert!(!g.is_paused());
    }

    #[test]
    fn test_pause_and_resume_cycle() {
        let mut g = guard();
        g.evaluate(1, dec!(5));

        let t = g.evaluate(2, dec!(-6)).unwrap();
        assert_eq!(
            t,
            RiskTransition::Paused {
                time: 2,
                drawdown: dec!(11),
                pause_until: 7
            }
        );
        assert_eq!(g.state(), TradingState::Paused { since: 2, until: 7 });

        // Still breached: no repeated pause event.
        assert_eq!(g.evaluate(3, dec!(-8)), None);
        // Recovered but before pause_until.
        assert_eq!(g.evaluate(4, dec!(5)), None);
        assert!(g.is_paused());
        // Past pause_until but still breached.
        assert_eq!(g.evaluate(7, dec!(-6)), None);

        let t = g.evaluate(8, dec!(0)).unwrap();
        assert_eq!(t, RiskTransition::Resumed { time: 8, drawdown: dec!(5) });
        assert_eq!(g.state(), TradingState::Active);
        assert_eq!(g.worst_drawdown(), dec!(13));
    }

    #[test]
    fn test_second_breach_pauses_again() {
        let mut g = guard();
        g.evaluate(1, dec!(-11));
        g.evaluate(6, dec!(0));
        assert!(!g.is_paused());
        assert!(matches!(g.evaluate(7, dec!(-11)), Some(RiskTransition::Paused { .. })));
    }

    #[test]
    fn test_drawdown_saturates_at_decimal_limit() {
        let mut g = guard();
        g.evaluate(1, dec!(10));
        let t = g.evaluate(2, Decimal::MIN);
        assert_eq!(g.drawdown(), Decimal::MAX);
        assert!(matches!(t, Some(RiskTransition::Paused { .. })));
    }

    #[test]
    fn test_transition_serde() {
        let json = serde_json::to_value(RiskTransition::Resumed {
            time: 3,
            drawdown: dec!(1),
        })
        .unwrap();
        assert_eq!(json["transition"], "resumed");
    }
}
