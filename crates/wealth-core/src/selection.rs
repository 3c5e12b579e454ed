//! Pair selection: who trades with whom each round.
//!
//! Each round the engine asks a [`PairSelector`] for a [`TradePair`]. The
//! live selector, [`UniformPairSelector`], draws the sender uniformly from
//! the population and then redraws the receiver until it differs from the
//! sender. That is plain rejection sampling, so both indices are uniform
//! over `[0, n)` and never equal.
//!
//! The random generator is owned by the selector rather than shared
//! globally. Live runs seed it once from the wall clock; tests seed it
//! explicitly, or bypass randomness entirely with [`ScriptedPairSelector`].

use std::collections::VecDeque;

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Errors that can occur while selecting a trading pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Fewer than two agents: no distinct pair exists.
    #[error("cannot pick two distinct agents from a population of {population}")]
    InvalidPopulationSize {
        /// The population that was asked for.
        population: usize,
    },

    /// A scripted pair does not fit the population it was drawn for.
    #[error("scripted pair ({sender}, {receiver}) is invalid for a population of {population}")]
    InvalidScriptedPair {
        /// Scripted sender index.
        sender: usize,
        /// Scripted receiver index.
        receiver: usize,
        /// The population that was asked for.
        population: usize,
    },

    /// A scripted selector was asked for more pairs than it holds.
    #[error("scripted pair selector exhausted")]
    ScriptExhausted,
}

/// The two agents taking part in one trade.
///
/// Wealth always flows from `sender` to `receiver`; the trade rule only
/// decides how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradePair {
    /// Index of the agent losing wealth.
    pub sender: usize,
    /// Index of the agent gaining wealth.
    pub receiver: usize,
}

impl TradePair {
    /// Create a pair.
    pub const fn new(sender: usize, receiver: usize) -> Self {
        Self { sender, receiver }
    }
}

/// A source of trading pairs.
///
/// The engine calls [`next_pair`](PairSelector::next_pair) exactly once per
/// round, before the trade is applied.
pub trait PairSelector {
    /// Draw the pair for the next round from a population of `population`
    /// agents.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if no valid pair can be produced.
    fn next_pair(&mut self, population: usize) -> Result<TradePair, SelectionError>;
}

/// Pick two distinct indices in `[0, population)` from `rng`.
///
/// The sender is drawn once; the receiver is redrawn until it differs.
///
/// # Errors
///
/// Returns [`SelectionError::InvalidPopulationSize`] if `population < 2`.
pub fn pick_two_distinct<R: Rng>(
    rng: &mut R,
    population: usize,
) -> Result<TradePair, SelectionError> {
    if population < 2 {
        return Err(SelectionError::InvalidPopulationSize { population });
    }

    let sender = rng.random_range(0..population);
    let mut receiver = sender;
    while receiver == sender {
        receiver = rng.random_range(0..population);
    }
    Ok(TradePair { sender, receiver })
}

/// Uniform random pair selector backed by an owned generator.
#[derive(Debug, Clone)]
pub struct UniformPairSelector<R = SmallRng> {
    /// The generator every draw consumes.
    rng: R,
}

impl<R: Rng> UniformPairSelector<R> {
    /// Wrap an existing generator.
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl UniformPairSelector<SmallRng> {
    /// Deterministic selector for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    /// Selector seeded once from the wall clock.
    ///
    /// Returns the seed alongside the selector so the run can be logged and
    /// replayed.
    pub fn from_time_seed() -> (Self, u64) {
        let seed = time_seed();
        debug!(seed, "Seeding pair selector from wall clock");
        (Self::seeded(seed), seed)
    }
}

impl<R: Rng> PairSelector for UniformPairSelector<R> {
    fn next_pair(&mut self, population: usize) -> Result<TradePair, SelectionError> {
        pick_two_distinct(&mut self.rng, population)
    }
}

/// Nanoseconds since the Unix epoch, folded into a `u64` seed.
fn time_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .map_or_else(|| now.timestamp().unsigned_abs(), i64::unsigned_abs)
}

/// Replays a fixed sequence of pairs.
///
/// Used to force specific trades in scenario tests. Each pair is checked
/// against the population it is handed out for.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPairSelector {
    /// Pairs not yet handed out.
    pairs: VecDeque<TradePair>,
}

impl ScriptedPairSelector {
    /// Create a selector that yields `pairs` in order.
    pub fn new<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = TradePair>,
    {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Number of pairs left to hand out.
    pub fn remaining(&self) -> usize {
        self.pairs.len()
    }
}

impl PairSelector for ScriptedPairSelector {
    fn next_pair(&mut self, population: usize) -> Result<TradePair, SelectionError> {
        if population < 2 {
            return Err(SelectionError::InvalidPopulationSize { population });
        }
        let pair = self
            .pairs
            .pop_front()
            .ok_or(SelectionError::ScriptExhausted)?;
        if pair.sender == pair.receiver || pair.sender >= population || pair.receiver >= population
        {
            return Err(SelectionError::InvalidScriptedPair {
                sender: pair.sender,
                receiver: pair.receiver,
                population,
            });
        }
        Ok(pair)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_populations_below_two() {
        let mut rng = SmallRng::seed_from_u64(42);
        for population in [0, 1] {
            assert_eq!(
                pick_two_distinct(&mut rng, population),
                Err(SelectionError::InvalidPopulationSize { population })
            );
        }
    }

    #[test]
    fn pairs_are_distinct_and_in_range() {
        for population in 2..=12_usize {
            let mut selector = UniformPairSelector::seeded(population as u64);
            for _ in 0..2_000 {
                let pair = selector.next_pair(population).unwrap();
                assert_ne!(pair.sender, pair.receiver);
                assert!(pair.sender < population);
                assert!(pair.receiver < population);
            }
        }
    }

    #[test]
    fn population_of_two_always_pairs_both_agents() {
        let mut selector = UniformPairSelector::seeded(7);
        for _ in 0..500 {
            let pair = selector.next_pair(2).unwrap();
            assert_eq!(pair.sender + pair.receiver, 1);
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn draws_cover_population_roughly_uniformly() {
        const POPULATION: usize = 10;
        const DRAWS: usize = 100_000;
        let mut selector = UniformPairSelector::seeded(2024);
        let mut senders = [0_usize; POPULATION];
        let mut receivers = [0_usize; POPULATION];

        for _ in 0..DRAWS {
            let pair = selector.next_pair(POPULATION).unwrap();
            if let Some(count) = senders.get_mut(pair.sender) {
                *count += 1;
            }
            if let Some(count) = receivers.get_mut(pair.receiver) {
                *count += 1;
            }
        }

        // Expected 10 000 per slot; allow 5% either way.
        let expected = (DRAWS / POPULATION) as f64;
        for count in senders.iter().chain(receivers.iter()) {
            let ratio = *count as f64 / expected;
            assert!((0.95..=1.05).contains(&ratio), "skewed count {count}");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = UniformPairSelector::seeded(99);
        let mut b = UniformPairSelector::seeded(99);
        for _ in 0..100 {
            assert_eq!(a.next_pair(10).unwrap(), b.next_pair(10).unwrap());
        }
    }

    #[test]
    fn time_seeded_selector_reports_its_seed() {
        let (mut selector, seed) = UniformPairSelector::from_time_seed();
        let mut replay = UniformPairSelector::seeded(seed);
        for _ in 0..20 {
            assert_eq!(selector.next_pair(10).unwrap(), replay.next_pair(10).unwrap());
        }
    }

    #[test]
    fn scripted_pairs_replay_in_order() {
        let mut selector =
            ScriptedPairSelector::new([TradePair::new(0, 1), TradePair::new(1, 0)]);
        assert_eq!(selector.remaining(), 2);
        assert_eq!(selector.next_pair(2).unwrap(), TradePair::new(0, 1));
        assert_eq!(selector.next_pair(2).unwrap(), TradePair::new(1, 0));
        assert_eq!(selector.next_pair(2), Err(SelectionError::ScriptExhausted));
    }

    #[test]
    fn scripted_pairs_are_validated() {
        let mut selector =
            ScriptedPairSelector::new([TradePair::new(1, 1), TradePair::new(0, 5)]);
        assert!(matches!(
            selector.next_pair(3),
            Err(SelectionError::InvalidScriptedPair { .. })
        ));
        assert!(matches!(
            selector.next_pair(3),
            Err(SelectionError::InvalidScriptedPair { .. })
        ));
    }
}
