//! Agent wealth ledger for the wealth exchange simulation.
//!
//! Every agent in the market is identified solely by its index into the
//! ledger. The ledger holds one `f64` balance per agent and is the only
//! mutable state a trade touches.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`WealthLedger`] struct: fixed-length balances with
//!   checked reads and writes.
//! - [`stats`] -- Read-only distribution statistics ([`DistributionStats`])
//!   used by the chart and by the inequality tests.
//!
//! # Aggregate Drift
//!
//! Unlike a double-entry ledger, the sum of balances is not a conserved
//! quantity across a run. A single trade moves wealth from one slot to
//! another without creating any, but the trading rule picks its percentage
//! from whichever side is poorer, so the total drifts over many rounds.
//! The ledger records that drift faithfully and never rebalances.
//!
//! # Usage
//!
//! ```
//! use wealth_ledger::WealthLedger;
//!
//! let mut ledger = WealthLedger::new(3, 100.0);
//! ledger.set(0, 80.0).ok();
//! ledger.set(2, 120.0).ok();
//!
//! assert_eq!(ledger.len(), 3);
//! assert!(ledger.get(3).is_err());
//! assert!((ledger.total() - 300.0).abs() < 1e-9);
//! ```

pub mod ledger;
pub mod stats;

// Re-export primary types at crate root.
pub use ledger::WealthLedger;
pub use stats::DistributionStats;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when reading or writing ledger balances.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The agent index does not address a slot in the ledger.
    #[error("agent index {index} out of range for ledger of {len} agents")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of agents in the ledger.
        len: usize,
    },
}
