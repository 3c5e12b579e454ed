//! The trading rule: how much wealth moves in a single trade.
//!
//! Wealth always flows from the sender to the receiver. The amount is a
//! percentage of whichever party is poorer:
//!
//! | Condition                    | Branch           | Transfer                       |
//! |------------------------------|------------------|--------------------------------|
//! | `sender < receiver`          | [`Loss`]         | `sender * percent_loss`        |
//! | `sender >= receiver`         | [`Gain`]         | `receiver * percent_gain`      |
//!
//! Ties take the gain branch because the comparison is strict. The two
//! percentages differ (20% and 17% by default), so while every single
//! trade conserves the pair's combined wealth, the population total drifts
//! over many rounds. Balances are never clamped.
//!
//! [`Loss`]: TradeBranch::Loss
//! [`Gain`]: TradeBranch::Gain

use tracing::trace;
use wealth_ledger::{LedgerError, WealthLedger};

use crate::config::TradeConfig;
use crate::selection::TradePair;

/// Errors that can occur while applying a trade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    /// Sender and receiver are the same agent.
    #[error("agent {agent} cannot trade with itself")]
    SelfTrade {
        /// The agent on both sides.
        agent: usize,
    },

    /// The pair addresses an agent outside the ledger.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}

/// Which side's wealth set the transfer amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeBranch {
    /// The receiver was poorer or equal; it gains `percent_gain` of its
    /// own wealth.
    Gain,
    /// The sender was strictly poorer; it loses `percent_loss` of its own
    /// wealth.
    Loss,
}

/// Record of one applied trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeOutcome {
    /// The agents involved.
    pub pair: TradePair,
    /// Wealth moved from sender to receiver.
    pub amount: f64,
    /// Which percentage produced `amount`.
    pub branch: TradeBranch,
}

/// The two-percentage trading rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRule {
    /// Share of the receiver's wealth moved on the gain branch.
    percent_gain: f64,
    /// Share of the sender's wealth moved on the loss branch.
    percent_loss: f64,
}

impl TradeRule {
    /// Create a rule from the two percentages.
    ///
    /// Range checking happens in
    /// [`SimulationConfig::validate`](crate::config::SimulationConfig::validate).
    pub const fn new(percent_gain: f64, percent_loss: f64) -> Self {
        Self {
            percent_gain,
            percent_loss,
        }
    }

    /// Build the rule from its configuration section.
    pub const fn from_config(config: &TradeConfig) -> Self {
        Self::new(config.percent_gain, config.percent_loss)
    }

    /// Share of the receiver's wealth moved on the gain branch.
    pub const fn percent_gain(&self) -> f64 {
        self.percent_gain
    }

    /// Share of the sender's wealth moved on the loss branch.
    pub const fn percent_loss(&self) -> f64 {
        self.percent_loss
    }

    /// Compute the transfer for the given balances without touching any
    /// ledger.
    pub fn transfer(&self, sender_wealth: f64, receiver_wealth: f64) -> (f64, TradeBranch) {
        if sender_wealth < receiver_wealth {
            (sender_wealth * self.percent_loss, TradeBranch::Loss)
        } else {
            (receiver_wealth * self.percent_gain, TradeBranch::Gain)
        }
    }

    /// Apply one trade to the ledger in place.
    ///
    /// Both balances are read before either is written, so a failed lookup
    /// leaves the ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TradeError::SelfTrade`] if sender and receiver coincide, or
    /// [`TradeError::Ledger`] if either index is out of range.
    pub fn apply(
        &self,
        ledger: &mut WealthLedger,
        pair: TradePair,
    ) -> Result<TradeOutcome, TradeError> {
        if pair.sender == pair.receiver {
            return Err(TradeError::SelfTrade { agent: pair.sender });
        }

        let sender_wealth = ledger.get(pair.sender)?;
        let receiver_wealth = ledger.get(pair.receiver)?;
        let (amount, branch) = self.transfer(sender_wealth, receiver_wealth);

        ledger.set(pair.sender, sender_wealth - amount)?;
        ledger.set(pair.receiver, receiver_wealth + amount)?;

        trace!(
            sender = pair.sender,
            receiver = pair.receiver,
            amount,
            ?branch,
            "Trade applied"
        );

        Ok(TradeOutcome {
            pair,
            amount,
            branch,
        })
    }
}

impl Default for TradeRule {
    fn default() -> Self {
        Self::from_config(&TradeConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn equal_wealth_takes_gain_branch() {
        let rule = TradeRule::default();
        let mut ledger = WealthLedger::new(2, 100.0);

        let outcome = rule.apply(&mut ledger, TradePair::new(0, 1)).unwrap();

        assert_eq!(outcome.branch, TradeBranch::Gain);
        assert!(close(outcome.amount, 20.0));
        assert!(close(ledger.get(0).unwrap(), 80.0));
        assert!(close(ledger.get(1).unwrap(), 120.0));
    }

    #[test]
    fn richer_sender_pays_receiver_gain() {
        let rule = TradeRule::default();
        let mut ledger = WealthLedger::from_balances(vec![80.0, 120.0]);

        let outcome = rule.apply(&mut ledger, TradePair::new(1, 0)).unwrap();

        assert_eq!(outcome.branch, TradeBranch::Gain);
        assert!(close(outcome.amount, 16.0));
        assert!(close(ledger.get(0).unwrap(), 96.0));
        assert!(close(ledger.get(1).unwrap(), 104.0));
    }

    #[test]
    fn poorer_sender_loses_percent_loss() {
        let rule = TradeRule::default();
        let mut ledger = WealthLedger::from_balances(vec![50.0, 200.0]);

        let outcome = rule.apply(&mut ledger, TradePair::new(0, 1)).unwrap();

        assert_eq!(outcome.branch, TradeBranch::Loss);
        assert!(close(outcome.amount, 8.5));
        assert!(close(ledger.get(0).unwrap(), 41.5));
        assert!(close(ledger.get(1).unwrap(), 208.5));
    }

    #[test]
    fn single_trade_conserves_pair_total() {
        let rule = TradeRule::default();
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..1_000 {
            let a: f64 = rng.random_range(0.0..1_000.0);
            let b: f64 = rng.random_range(0.0..1_000.0);
            let mut ledger = WealthLedger::from_balances(vec![a, b]);

            let outcome = rule.apply(&mut ledger, TradePair::new(0, 1)).unwrap();

            let after = ledger.get(0).unwrap() + ledger.get(1).unwrap();
            assert!((after - (a + b)).abs() < 1e-9 * (a + b).max(1.0));

            let expected = if a < b { a * 0.17 } else { b * 0.20 };
            assert!(close(outcome.amount, expected));
        }
    }

    #[test]
    fn untouched_agents_keep_their_wealth() {
        let rule = TradeRule::default();
        let mut ledger = WealthLedger::new(5, 100.0);
        rule.apply(&mut ledger, TradePair::new(3, 1)).unwrap();

        for idx in [0, 2, 4] {
            assert!(close(ledger.get(idx).unwrap(), 100.0));
        }
    }

    #[test]
    fn self_trade_is_rejected() {
        let rule = TradeRule::default();
        let mut ledger = WealthLedger::new(3, 100.0);
        let before = ledger.clone();

        let result = rule.apply(&mut ledger, TradePair::new(2, 2));

        assert_eq!(result, Err(TradeError::SelfTrade { agent: 2 }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn out_of_range_pair_leaves_ledger_untouched() {
        let rule = TradeRule::default();
        let mut ledger = WealthLedger::new(2, 100.0);
        let before = ledger.clone();

        let result = rule.apply(&mut ledger, TradePair::new(0, 2));

        assert!(matches!(result, Err(TradeError::Ledger { .. })));
        assert_eq!(ledger, before);
    }

    #[test]
    fn zero_wealth_receiver_gains_nothing() {
        let rule = TradeRule::default();
        let mut ledger = WealthLedger::from_balances(vec![10.0, 0.0]);

        let outcome = rule.apply(&mut ledger, TradePair::new(0, 1)).unwrap();

        assert_eq!(outcome.branch, TradeBranch::Gain);
        assert!(close(outcome.amount, 0.0));
        assert!(close(ledger.get(0).unwrap(), 10.0));
    }

    #[test]
    fn custom_percentages() {
        let rule = TradeRule::new(0.5, 0.25);
        assert!(close(rule.percent_gain(), 0.5));
        assert!(close(rule.percent_loss(), 0.25));

        let (amount, branch) = rule.transfer(40.0, 100.0);
        assert_eq!(branch, TradeBranch::Loss);
        assert!(close(amount, 10.0));

        let (amount, branch) = rule.transfer(100.0, 40.0);
        assert_eq!(branch, TradeBranch::Gain);
        assert!(close(amount, 20.0));
    }
}
