//! Wealth chart widget - one bar per agent plus a status line.
//!
//! The vertical axis is rescaled every frame to the current richest agent
//! plus a small headroom towards the theoretical maximum, so the shape of
//! the distribution stays visible long before anyone approaches owning
//! everything.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};
use wealth_ledger::DistributionStats;

/// Share of the gap between the current and the theoretical maximum added
/// above the tallest bar.
pub const HEADROOM: f64 = 0.05;

/// Bar values are integers; balances are drawn in tenths.
const VALUE_SCALE: f64 = 10.0;

/// Width of each bar in cells.
const BAR_WIDTH: u16 = 5;

/// Compute the top of the chart axis.
///
/// `current_max + (max_possible - current_max) * HEADROOM`, never below
/// `current_max` so the tallest bar is not clipped if the total has drifted
/// past the starting total.
pub fn chart_ceiling(current_max: f64, max_possible: f64) -> f64 {
    let ceiling = current_max + (max_possible - current_max) * HEADROOM;
    ceiling.max(current_max)
}

/// Convert a balance to a bar height in tenths.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_value(wealth: f64) -> u64 {
    if wealth.is_finite() && wealth > 0.0 {
        (wealth * VALUE_SCALE).round() as u64
    } else {
        0
    }
}

/// Bar chart of agent wealth.
pub struct WealthChart<'a> {
    /// Every agent's wealth, in agent order.
    wealth: &'a [f64],
    /// Population size times initial wealth.
    max_possible: f64,
    /// Rounds completed so far.
    rounds_completed: u64,
    /// Configured round budget.
    round_limit: u64,
    /// Footer hint.
    hint: &'a str,
}

impl<'a> WealthChart<'a> {
    /// Create a chart for the given balances.
    pub const fn new(wealth: &'a [f64], max_possible: f64) -> Self {
        Self {
            wealth,
            max_possible,
            rounds_completed: 0,
            round_limit: 0,
            hint: "press any key to stop",
        }
    }

    /// Set round progress for the status line.
    pub const fn progress(mut self, rounds_completed: u64, round_limit: u64) -> Self {
        self.rounds_completed = rounds_completed;
        self.round_limit = round_limit;
        self
    }

    /// Set the footer hint.
    pub const fn hint(mut self, hint: &'a str) -> Self {
        self.hint = hint;
        self
    }

    fn status_line(&self) -> Line<'a> {
        let stats = DistributionStats::from_balances(self.wealth);
        let label = Style::default().fg(Color::Gray);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        Line::from(vec![
            Span::styled(" Round ", label),
            Span::styled(
                format!("{}/{}", self.rounds_completed, self.round_limit),
                value,
            ),
            Span::styled("  Total ", label),
            Span::styled(format!("{:.1}", stats.total), value),
            Span::styled("  Richest ", label),
            Span::styled(format!("{:.1}", stats.max), value),
            Span::styled("  Gini ", label),
            Span::styled(format!("{:.3}", stats.gini), value),
            Span::styled(format!("  ({})", self.hint), Style::default().fg(Color::DarkGray)),
        ])
    }
}

impl Widget for WealthChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        let (Some(chart_area), Some(status_area)) = (chunks.first(), chunks.get(1)) else {
            return;
        };

        let current_max = self.wealth.iter().copied().fold(0.0, f64::max);
        let ceiling = chart_ceiling(current_max, self.max_possible);

        let bars: Vec<Bar<'_>> = self
            .wealth
            .iter()
            .enumerate()
            .map(|(agent, wealth)| {
                Bar::default()
                    .value(bar_value(*wealth))
                    .text_value(format!("{wealth:.1}"))
                    .label(Line::from(agent.to_string()))
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .title("Agents' Wealth")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::White)),
            )
            .bar_width(BAR_WIDTH)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .label_style(Style::default().fg(Color::Blue))
            .data(BarGroup::default().bars(&bars))
            .max(bar_value(ceiling).max(1));

        Widget::render(chart, *chart_area, buf);
        Widget::render(Paragraph::new(self.status_line()), *status_area, buf);
    }
}
