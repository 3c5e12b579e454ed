//! Terminal lifecycle and the [`RenderPort`] implementation.

use std::io::{self, Stdout};

use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tracing::debug;
use wealth_core::render::{RenderError, RenderPort, RoundFrame};

use crate::chart::WealthChart;

/// Crossterm backend on stdout, the production drawing target.
pub type StdoutBackend = CrosstermBackend<Stdout>;

/// Put the terminal into raw mode on the alternate screen.
///
/// # Errors
///
/// Returns the underlying I/O error if the terminal cannot be configured.
pub fn init_terminal() -> io::Result<Terminal<StdoutBackend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its normal state.
///
/// Works on stdout directly, so it can run even when the [`Terminal`] was
/// lost with a panicked simulation task.
///
/// # Errors
///
/// Returns the underlying I/O error if the terminal cannot be restored.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// Draws every round as a [`WealthChart`].
pub struct TerminalRenderer<B: Backend> {
    /// The terminal being drawn to.
    terminal: Terminal<B>,
    /// Population size times initial wealth, the chart's theoretical top.
    max_possible: f64,
    /// Frames drawn so far.
    frames: u64,
}

impl<B: Backend> TerminalRenderer<B> {
    /// Wrap a terminal.
    pub const fn new(terminal: Terminal<B>, max_possible: f64) -> Self {
        Self {
            terminal,
            max_possible,
            frames: 0,
        }
    }

    /// Draw the starting distribution before any round has run.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the terminal cannot be drawn to.
    pub fn draw_initial(&mut self, wealth: &[f64], round_limit: u64) -> Result<(), RenderError> {
        let max_possible = self.max_possible;
        self.terminal.draw(|f| {
            let chart = WealthChart::new(wealth, max_possible).progress(0, round_limit);
            f.render_widget(chart, f.area());
        })?;
        Ok(())
    }

    /// Redraw the last distribution with a closing hint once the loop has
    /// stopped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the terminal cannot be drawn to.
    pub fn draw_final(
        &mut self,
        wealth: &[f64],
        rounds_completed: u64,
        round_limit: u64,
    ) -> Result<(), RenderError> {
        let max_possible = self.max_possible;
        self.terminal.draw(|f| {
            let chart = WealthChart::new(wealth, max_possible)
                .progress(rounds_completed, round_limit)
                .hint("press any key to exit");
            f.render_widget(chart, f.area());
        })?;
        debug!(frames = self.frames, rounds_completed, "Final frame drawn");
        Ok(())
    }

    /// Number of round frames drawn.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Borrow the underlying terminal.
    pub const fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> RenderPort for TerminalRenderer<B> {
    fn render(&mut self, frame: &RoundFrame<'_>) -> Result<(), RenderError> {
        let max_possible = self.max_possible;
        self.terminal.draw(|f| {
            let chart = WealthChart::new(frame.wealth, max_possible)
                .progress(frame.rounds_completed(), frame.round_limit);
            f.render_widget(chart, f.area());
        })?;
        self.frames = self.frames.saturating_add(1);
        Ok(())
    }
}
