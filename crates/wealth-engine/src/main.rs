//! Wealth engine binary for the wealth exchange simulation.
//!
//! Wires the round loop to the terminal chart and the key watcher. It
//! loads configuration, initializes logging and the terminal, runs the
//! loop on a blocking thread, and keeps the final chart on screen until a
//! key is pressed.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `wealth-config.yaml` (defaults if absent)
//! 2. Initialize file logging (tracing)
//! 3. Build the starting state and the seeded pair selector
//! 4. Put the terminal into chart mode
//! 5. Spawn the input watcher
//! 6. Run the simulation loop
//! 7. Log the result and wait for a key
//! 8. Restore the terminal

mod error;
mod logging;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use wealth_core::config::{SEED_ENV, SimulationConfig};
use wealth_core::round::SimulationState;
use wealth_core::runner;
use wealth_core::selection::UniformPairSelector;
use wealth_core::signal::StopSignal;
use wealth_tui::{StdoutBackend, TerminalRenderer, WatchOutcome};

use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "wealth-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error, and a non-zero exit code, if any setup step or the
/// simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging.
    logging::init(&config.logging)?;
    info!("wealth-engine starting");
    info!(
        agents = config.population.size,
        initial_wealth = config.population.initial_wealth,
        percent_gain = config.trade.percent_gain,
        percent_loss = config.trade.percent_loss,
        round_limit = config.simulation.round_limit,
        round_interval_ms = config.simulation.round_interval_ms,
        "Configuration loaded"
    );

    // 3. Build state and selector.
    let state = SimulationState::from_config(&config)?;
    let selector = build_selector(config.simulation.seed);

    // 4. Terminal.
    let terminal = wealth_tui::init_terminal().map_err(|e| EngineError::Terminal {
        message: format!("failed to initialize terminal: {e}"),
    })?;
    let renderer = TerminalRenderer::new(terminal, config.population.max_possible_wealth());
    info!("Terminal initialized");

    // 5-7. Watcher, run, wait.
    let session = Session {
        state,
        selector,
        renderer,
        stop: Arc::new(StopSignal::new()),
        round_interval: Duration::from_millis(config.simulation.round_interval_ms),
    };
    let outcome = session.run().await;

    // 8. Restore the terminal on every path.
    if let Err(e) = wealth_tui::restore_terminal() {
        warn!(error = %e, "Failed to restore terminal");
    }

    match &outcome {
        Ok(()) => info!("wealth-engine shutdown complete"),
        Err(e) => warn!(error = %e, "wealth-engine exiting with error"),
    }
    outcome
}

/// Load the simulation configuration.
///
/// Reads `path` when it exists; otherwise starts from defaults. In both
/// cases environment overrides are applied and the result is validated.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    let config = if path.exists() {
        SimulationConfig::from_file(path)?
    } else {
        SimulationConfig::from_env()?
    };
    Ok(config)
}

/// Seed the pair selector from config or, when unset, from the clock.
///
/// The seed in use is always logged so a run can be replayed.
fn build_selector(seed: Option<u64>) -> UniformPairSelector {
    match seed {
        Some(seed) => {
            info!(seed, "Pair selector seeded from configuration");
            UniformPairSelector::seeded(seed)
        }
        None => {
            let (selector, seed) = UniformPairSelector::from_time_seed();
            info!(seed, replay_with = SEED_ENV, "Pair selector seeded from clock");
            selector
        }
    }
}

/// Everything the run needs once the terminal is in chart mode.
struct Session {
    /// Starting state.
    state: SimulationState,
    /// Pair source.
    selector: UniformPairSelector,
    /// Chart renderer owning the terminal.
    renderer: TerminalRenderer<StdoutBackend>,
    /// Shared stop flag.
    stop: Arc<StopSignal>,
    /// Pause between rounds.
    round_interval: Duration,
}

impl Session {
    /// Draw the starting chart, run the loop, log the result, and wait for
    /// the stop signal before returning.
    async fn run(self) -> Result<(), EngineError> {
        let Self {
            mut state,
            mut selector,
            mut renderer,
            stop,
            round_interval,
        } = self;

        renderer.draw_initial(state.ledger.as_slice(), state.round_limit)?;

        let watcher =
            wealth_tui::spawn_key_watcher(Arc::clone(&stop)).map_err(|e| EngineError::Watcher {
                message: format!("failed to spawn input watcher: {e}"),
            })?;

        let cancel = Arc::clone(&stop);
        let (mut renderer, state, result) = tokio::task::spawn_blocking(move || {
            let result = runner::run_simulation(
                &mut state,
                &mut selector,
                &mut renderer,
                cancel.as_ref(),
                round_interval,
            );
            (renderer, state, result)
        })
        .await
        .map_err(|e| EngineError::Task {
            message: e.to_string(),
        })?;
        let result = result?;

        runner::log_simulation_end(&result, &state);
        match serde_json::to_string(&state.ledger) {
            Ok(json) => info!(ledger = %json, "Final ledger"),
            Err(e) => warn!(error = %e, "Failed to serialize final ledger"),
        }

        renderer.draw_final(
            state.ledger.as_slice(),
            result.rounds_completed,
            state.round_limit,
        )?;

        // Keep the final chart up until a key is pressed.
        stop.wait().await;

        match watcher.join() {
            Ok(WatchOutcome::KeyPressed) => info!("Stopped by key press"),
            Ok(outcome) => warn!(?outcome, "Input watcher ended without a key press"),
            Err(_) => warn!("Input watcher panicked"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wealth_core::selection::PairSelector;

    use super::*;

    #[test]
    fn seeded_selector_is_reproducible() {
        let mut a = build_selector(Some(7));
        let mut b = build_selector(Some(7));
        for _ in 0..50 {
            assert_eq!(a.next_pair(10).unwrap(), b.next_pair(10).unwrap());
        }
    }

    #[test]
    fn clock_selector_draws_valid_pairs() {
        let mut selector = build_selector(None);
        let pair = selector.next_pair(2).unwrap();
        assert_ne!(pair.sender, pair.receiver);
        assert!(pair.sender < 2 && pair.receiver < 2);
    }

    #[test]
    fn invalid_config_file_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "wealth-engine-invalid-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "population:\n  size: 1\n").unwrap();

        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(EngineError::Config { .. })));
    }

    #[test]
    fn config_file_values_are_used() {
        let path = std::env::temp_dir().join(format!(
            "wealth-engine-valid-{}.yaml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "population:\n  size: 4\n  initial_wealth: 50.0\ntrade:\n  percent_gain: 0.1\n",
        )
        .unwrap();

        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();

        let config = result.unwrap();
        assert_eq!(config.population.size, 4);
        assert!((config.trade.percent_gain - 0.1).abs() < f64::EPSILON);
        assert!((config.trade.percent_loss - 0.17).abs() < f64::EPSILON);
    }
}
