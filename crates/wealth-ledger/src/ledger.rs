//! The wealth ledger: one balance per agent, fixed for the length of a run.
//!
//! The [`WealthLedger`] is created once from the configured population and
//! initial wealth and then mutated in place, one trade at a time, by the
//! simulation thread. It never grows or shrinks.
//!
//! # Design
//!
//! - **Index identity**: agent `i` is slot `i`; there is no separate agent
//!   record.
//! - **Checked access**: every read and write is bounds-checked and returns
//!   [`LedgerError::IndexOutOfRange`] rather than panicking.
//! - **No clamping**: balances are stored exactly as written, including
//!   values a caller drives towards zero.

use serde::Serialize;

use crate::LedgerError;
use crate::stats::DistributionStats;

/// Fixed-length vector of agent balances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthLedger {
    /// Balances, indexed by agent.
    balances: Vec<f64>,
}

impl WealthLedger {
    /// Create a ledger of `population` agents, each holding `initial_wealth`.
    pub fn new(population: usize, initial_wealth: f64) -> Self {
        Self {
            balances: vec![initial_wealth; population],
        }
    }

    /// Build a ledger from explicit balances.
    ///
    /// Used to resume from a known distribution, mostly in tests.
    pub const fn from_balances(balances: Vec<f64>) -> Self {
        Self { balances }
    }

    /// Return the number of agents in the ledger.
    pub const fn len(&self) -> usize {
        self.balances.len()
    }

    /// Return whether the ledger has no agents.
    pub const fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Read the balance of agent `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<f64, LedgerError> {
        self.balances
            .get(index)
            .copied()
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: self.balances.len(),
            })
    }

    /// Overwrite the balance of agent `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IndexOutOfRange`] if `index >= len()`.
    pub fn set(&mut self, index: usize, value: f64) -> Result<(), LedgerError> {
        let len = self.balances.len();
        let slot = self
            .balances
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Borrow the full, ordered balance vector.
    pub fn as_slice(&self) -> &[f64] {
        &self.balances
    }

    /// Sum of all balances.
    pub fn total(&self) -> f64 {
        self.balances.iter().sum()
    }

    /// Largest balance, or `None` for an empty ledger.
    pub fn max(&self) -> Option<f64> {
        self.balances.iter().copied().reduce(f64::max)
    }

    /// Smallest balance, or `None` for an empty ledger.
    pub fn min(&self) -> Option<f64> {
        self.balances.iter().copied().reduce(f64::min)
    }

    /// Snapshot of the distribution statistics for the current balances.
    pub fn stats(&self) -> DistributionStats {
        DistributionStats::from_balances(&self.balances)
    }
}
