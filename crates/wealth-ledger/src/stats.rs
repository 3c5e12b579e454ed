//! Distribution statistics over a set of agent balances.
//!
//! These are read-only summaries of the ledger at a single instant. The
//! chart shows them in its status line, the engine logs them at the end of
//! a run, and the inequality tests use [`DistributionStats::variance`] to
//! check that trading spreads an initially equal distribution.

use serde::Serialize;

/// Summary statistics of a wealth distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionStats {
    /// Number of agents summarised.
    pub agents: usize,
    /// Sum of all balances.
    pub total: f64,
    /// Arithmetic mean balance (0 for an empty set).
    pub mean: f64,
    /// Population variance of the balances (0 for an empty set).
    pub variance: f64,
    /// Largest balance (0 for an empty set).
    pub max: f64,
    /// Smallest balance (0 for an empty set).
    pub min: f64,
    /// Gini coefficient in `[0, 1)` for non-negative balances.
    pub gini: f64,
}

impl DistributionStats {
    /// Compute statistics for the given balances.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_balances(balances: &[f64]) -> Self {
        if balances.is_empty() {
            return Self {
                agents: 0,
                total: 0.0,
                mean: 0.0,
                variance: 0.0,
                max: 0.0,
                min: 0.0,
                gini: 0.0,
            };
        }

        let n = balances.len() as f64;
        let total: f64 = balances.iter().sum();
        let mean = total / n;
        let variance = balances
            .iter()
            .map(|w| {
                let d = w - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let max = balances.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = balances.iter().copied().fold(f64::INFINITY, f64::min);

        Self {
            agents: balances.len(),
            total,
            mean,
            variance,
            max,
            min,
            gini: gini(balances, total),
        }
    }

    /// Standard deviation of the balances.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Gini coefficient via the sorted-rank formula.
///
/// `G = 2 * sum(i * x_i) / (n * sum(x)) - (n + 1) / n` with `x` sorted
/// ascending and `i` counted from 1. Returns 0 when the total is not
/// positive, where the coefficient is undefined.
#[allow(clippy::cast_precision_loss)]
fn gini(balances: &[f64], total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    let mut sorted = balances.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .zip(1_u32..)
        .map(|(w, rank)| f64::from(rank) * w)
        .sum();
    (2.0 * weighted) / (n * total) - (n + 1.0) / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_is_all_zero() {
        let stats = DistributionStats::from_balances(&[]);
        assert_eq!(stats.agents, 0);
        assert!(close(stats.total, 0.0));
        assert!(close(stats.gini, 0.0));
    }

    #[test]
    fn equal_distribution_has_no_spread() {
        let stats = DistributionStats::from_balances(&[100.0; 10]);
        assert!(close(stats.total, 1000.0));
        assert!(close(stats.mean, 100.0));
        assert!(close(stats.variance, 0.0));
        assert!(close(stats.gini, 0.0));
        assert!(close(stats.max, 100.0));
        assert!(close(stats.min, 100.0));
    }

    #[test]
    fn variance_of_two_agents() {
        // Mean 100, deviations +-20.
        let stats = DistributionStats::from_balances(&[80.0, 120.0]);
        assert!(close(stats.variance, 400.0));
        assert!(close(stats.std_dev(), 20.0));
    }

    #[test]
    fn gini_of_total_concentration() {
        // One of four agents owns everything: G = (n - 1) / n.
        let stats = DistributionStats::from_balances(&[0.0, 0.0, 0.0, 400.0]);
        assert!(close(stats.gini, 0.75));
    }

    #[test]
    fn gini_ignores_ordering() {
        let a = DistributionStats::from_balances(&[10.0, 30.0, 60.0]);
        let b = DistributionStats::from_balances(&[60.0, 10.0, 30.0]);
        assert!(close(a.gini, b.gini));
        assert!(a.gini > 0.0);
    }

    #[test]
    fn gini_is_zero_when_nobody_has_anything() {
        let stats = DistributionStats::from_balances(&[0.0, 0.0]);
        assert!(close(stats.gini, 0.0));
    }
}
