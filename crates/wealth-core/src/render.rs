//! Render port: how the round loop hands its state to a display.
//!
//! After every completed round the loop builds a [`RoundFrame`] and passes
//! it to a [`RenderPort`]. The frame always carries the full, current,
//! ordered wealth vector; how it is drawn (and how the axis is scaled) is
//! up to the implementation.

use crate::trade::TradeOutcome;

/// Errors a renderer can report back to the round loop.
///
/// Any render error aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The display backend failed to draw.
    #[error("render backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl From<std::io::Error> for RenderError {
    fn from(source: std::io::Error) -> Self {
        Self::Backend {
            message: source.to_string(),
        }
    }
}

/// Snapshot of the market after one round.
#[derive(Debug, Clone, Copy)]
pub struct RoundFrame<'a> {
    /// Zero-based index of the round that just completed.
    pub round: u64,
    /// Configured round budget.
    pub round_limit: u64,
    /// Every agent's wealth, ordered by agent index.
    pub wealth: &'a [f64],
    /// The trade applied this round.
    pub trade: TradeOutcome,
}

impl RoundFrame<'_> {
    /// Number of rounds completed including this one.
    pub const fn rounds_completed(&self) -> u64 {
        self.round.saturating_add(1)
    }
}

/// Receives one frame per completed round.
pub trait RenderPort {
    /// Draw the given frame.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the frame could not be drawn.
    fn render(&mut self, frame: &RoundFrame<'_>) -> Result<(), RenderError>;
}

/// A renderer that draws nothing, for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpRenderer;

impl RenderPort for NoOpRenderer {
    fn render(&mut self, _frame: &RoundFrame<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}
