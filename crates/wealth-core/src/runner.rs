//! Simulation loop runner with cooperative cancellation.
//!
//! This module provides [`run_simulation`], the top-level function that
//! drives the round loop:
//!
//! - **Bounded run**: stop once `round_limit` rounds have completed.
//! - **Cooperative stop**: poll a [`CancelPort`] after every round and stop
//!   at the first round boundary where it is set.
//! - **Live rendering**: hand every round's [`RoundFrame`] to a
//!   [`RenderPort`] before the stop check, so the frame of the round in
//!   which a stop arrives is still drawn.
//!
//! The loop is a two-state machine, Running and Stopped. Stopped is
//! terminal: once the runner returns, the run cannot be resumed.
//!
//! The runner wraps the single-round [`run_round`] function and adds the
//! control plane around it.
//!
//! [`run_round`]: crate::round::run_round

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::render::{RenderError, RenderPort, RoundFrame};
use crate::round::{self, RoundError, RoundSummary, SimulationState};
use crate::selection::PairSelector;
use crate::signal::CancelPort;

/// Rounds between progress log lines at debug level.
const PROGRESS_LOG_INTERVAL: u64 = 1_000;

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A round failed to execute.
    #[error("round error: {source}")]
    Round {
        /// The underlying round error.
        #[from]
        source: RoundError,
    },

    /// The renderer failed to draw a frame.
    #[error("render error: {source}")]
    Render {
        /// The underlying render error.
        #[from]
        source: RenderError,
    },
}

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Every round in the budget was executed.
    RoundLimitReached,
    /// A stop was requested before the budget ran out.
    StopRequested,
}

/// Result of the simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last round summary, if any round completed.
    pub final_summary: Option<RoundSummary>,
    /// Total number of rounds executed by this call.
    pub rounds_completed: u64,
    /// Wall-clock time spent in the loop.
    pub elapsed: Duration,
}

/// Loop state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    /// Rounds remain and no stop has been observed.
    Running,
    /// Terminal.
    Stopped(SimulationEndReason),
}

impl LoopState {
    /// State on entry: a run with no budget left never enters Running.
    const fn initial(state: &SimulationState) -> Self {
        if state.is_exhausted() {
            Self::Stopped(SimulationEndReason::RoundLimitReached)
        } else {
            Self::Running
        }
    }

    /// State after a completed round.
    fn after_round(state: &SimulationState, cancel: &dyn CancelPort) -> Self {
        if state.is_exhausted() {
            Self::Stopped(SimulationEndReason::RoundLimitReached)
        } else if cancel.is_cancelled() {
            Self::Stopped(SimulationEndReason::StopRequested)
        } else {
            Self::Running
        }
    }
}

/// Run the round loop until the budget is exhausted or a stop is observed.
///
/// Each iteration draws a pair, applies the trade, renders the frame,
/// advances the round counter, and only then polls `cancel`. At least one
/// round (and one render) therefore happens whenever the budget is
/// non-zero, even if the stop was requested before the call. With a zero
/// budget no round runs and nothing is rendered.
///
/// `round_interval` pauses the thread between rounds; the pause is skipped
/// after the final round.
///
/// # Arguments
///
/// * `state` - Mutable simulation state (ledger, rule, round counter)
/// * `selector` - Source of trading pairs
/// * `renderer` - Called once per completed round
/// * `cancel` - Polled once per completed round
/// * `round_interval` - Pause between rounds
///
/// # Errors
///
/// Returns [`RunnerError`] if a round or a render fails. There is no
/// recovery mid-loop.
pub fn run_simulation(
    state: &mut SimulationState,
    selector: &mut dyn PairSelector,
    renderer: &mut dyn RenderPort,
    cancel: &dyn CancelPort,
    round_interval: Duration,
) -> Result<SimulationResult, RunnerError> {
    let started = Instant::now();
    let mut final_summary: Option<RoundSummary> = None;
    let mut rounds_completed: u64 = 0;

    info!(
        agents = state.ledger.len(),
        round_limit = state.round_limit,
        start_round = state.round,
        round_interval_ms = u64::try_from(round_interval.as_millis()).unwrap_or(u64::MAX),
        "Simulation starting"
    );

    let mut loop_state = LoopState::initial(state);
    while loop_state == LoopState::Running {
        // --- Select and trade ---
        let summary = round::run_round(state, selector)?;

        // --- Render ---
        renderer.render(&RoundFrame {
            round: summary.round,
            round_limit: state.round_limit,
            wealth: state.ledger.as_slice(),
            trade: summary.trade,
        })?;

        // --- Advance ---
        state.round = state.round.saturating_add(1);
        rounds_completed = rounds_completed.saturating_add(1);
        final_summary = Some(summary);

        if state.round % PROGRESS_LOG_INTERVAL == 0 {
            debug!(
                round = state.round,
                total_wealth = summary.total_wealth,
                "Round progress"
            );
        }

        // --- Check budget, then stop signal ---
        loop_state = LoopState::after_round(state, cancel);

        if loop_state == LoopState::Running && !round_interval.is_zero() {
            std::thread::sleep(round_interval);
        }
    }

    let end_reason = match loop_state {
        LoopState::Stopped(reason) => reason,
        LoopState::Running => SimulationEndReason::RoundLimitReached,
    };

    Ok(SimulationResult {
        end_reason,
        final_summary,
        rounds_completed,
        elapsed: started.elapsed(),
    })
}

/// Log the simulation end sequence.
///
/// Called after [`run_simulation`] returns, with the ledger in its final
/// state.
pub fn log_simulation_end(result: &SimulationResult, state: &SimulationState) {
    info!(
        reason = ?result.end_reason,
        rounds_completed = result.rounds_completed,
        final_round = result.final_summary.as_ref().map(|s| s.round),
        elapsed_ms = u64::try_from(result.elapsed.as_millis()).unwrap_or(u64::MAX),
        "Simulation ended"
    );

    if result.final_summary.is_some() {
        let stats = state.ledger.stats();
        info!(
            total = stats.total,
            mean = stats.mean,
            variance = stats.variance,
            richest = stats.max,
            poorest = stats.min,
            gini = stats.gini,
            "Final wealth distribution"
        );
    } else {
        warn!("Simulation ended with no rounds executed");
    }
}
