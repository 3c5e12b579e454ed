//! Terminal front end for the wealth exchange simulation.
//!
//! This crate implements the two collaborators the round loop talks to:
//!
//! - [`TerminalRenderer`] -- a [`RenderPort`] that draws every round as a
//!   bar chart of agent wealth with a one-line status bar.
//! - [`spawn_key_watcher`] -- an OS thread that blocks on terminal events
//!   and requests a stop on the first key press.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   RoundFrame    ┌──────────────────┐
//! │   Round loop   │ ──────────────► │ TerminalRenderer │
//! │ (sim thread)   │                 └──────────────────┘
//! │                │   is_cancelled  ┌──────────────────┐
//! │                │ ◄────────────── │   StopSignal     │ ◄── key watcher
//! └────────────────┘                 └──────────────────┘     (own thread)
//! ```
//!
//! The renderer runs on the simulation thread, so a slow terminal slows the
//! rounds down but can never observe a half-applied trade.
//!
//! [`RenderPort`]: wealth_core::render::RenderPort

mod chart;
mod terminal;
mod watcher;

pub use chart::{HEADROOM, WealthChart, chart_ceiling};
pub use terminal::{StdoutBackend, TerminalRenderer, init_terminal, restore_terminal};
pub use watcher::{WatchOutcome, spawn_key_watcher, watch_events};
