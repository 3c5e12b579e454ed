//! A single trading round: select a pair, apply the trade.
//!
//! [`run_round`] is the unit of work the runner repeats. It touches only
//! the [`SimulationState`] it is given and the selector's generator, so a
//! round is deterministic for a given state and pair sequence.
//!
//! Rendering, the round counter, and cancellation belong to the runner
//! (see [`crate::runner`]); a round never blocks.

use wealth_ledger::WealthLedger;

use crate::config::{ConfigError, SimulationConfig};
use crate::selection::{PairSelector, SelectionError};
use crate::trade::{TradeError, TradeOutcome, TradeRule};

/// Errors that can occur while executing a round.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// No pair could be drawn.
    #[error("selection error: {source}")]
    Selection {
        /// The underlying selection error.
        #[from]
        source: SelectionError,
    },

    /// The drawn pair could not be traded.
    #[error("trade error: {source}")]
    Trade {
        /// The underlying trade error.
        #[from]
        source: TradeError,
    },
}

/// Summary of a single round's execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    /// Zero-based index of the round that was executed.
    pub round: u64,
    /// The trade applied.
    pub trade: TradeOutcome,
    /// Sum of all balances after the trade.
    pub total_wealth: f64,
}

/// The mutable simulation state passed through every round.
///
/// Owned by the simulation thread for the whole run; nothing else reads or
/// writes it while the loop is running.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Agent balances.
    pub ledger: WealthLedger,
    /// The trading rule.
    pub rule: TradeRule,
    /// Index of the next round to run (equals rounds completed so far).
    pub round: u64,
    /// Number of rounds the run is allowed.
    pub round_limit: u64,
}

impl SimulationState {
    /// Assemble a state at round zero.
    pub const fn new(ledger: WealthLedger, rule: TradeRule, round_limit: u64) -> Self {
        Self {
            ledger,
            rule,
            round: 0,
            round_limit,
        }
    }

    /// Validate the configuration and build the starting state: every agent
    /// at the initial wealth, round zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if the configuration
    /// fails [`SimulationConfig::validate`].
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            WealthLedger::new(config.population.size, config.population.initial_wealth),
            TradeRule::from_config(&config.trade),
            config.simulation.round_limit,
        ))
    }

    /// Whether the round budget has been used up.
    pub const fn is_exhausted(&self) -> bool {
        self.round >= self.round_limit
    }
}

/// Execute one round: draw a pair and apply the trade to the ledger.
///
/// Does not advance `state.round`; the runner does that after rendering.
///
/// # Errors
///
/// Returns [`RoundError`] if the selector cannot produce a pair or the trade
/// cannot be applied. The ledger is unchanged in either case.
pub fn run_round(
    state: &mut SimulationState,
    selector: &mut dyn PairSelector,
) -> Result<RoundSummary, RoundError> {
    let pair = selector.next_pair(state.ledger.len())?;
    let trade = state.rule.apply(&mut state.ledger, pair)?;

    Ok(RoundSummary {
        round: state.round,
        trade,
        total_wealth: state.ledger.total(),
    })
}
