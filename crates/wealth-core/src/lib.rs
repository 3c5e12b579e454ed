//! Pair selection, trade rule, and round loop for the wealth exchange
//! simulation.
//!
//! A fixed population of agents trades pairwise, one trade per round. Each
//! round a pair is drawn uniformly at random, wealth flows from sender to
//! receiver by the two-percentage trading rule, the new distribution is
//! handed to a renderer, and a stop flag is polled.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `wealth-config.yaml` into
//!   strongly-typed structs, with validation.
//! - [`selection`] -- [`PairSelector`] trait, uniform and scripted selectors.
//! - [`trade`] -- [`TradeRule`]: how much wealth moves in one trade.
//! - [`round`] -- [`SimulationState`] and the single-round step.
//! - [`render`] -- [`RenderPort`] trait and the per-round [`RoundFrame`].
//! - [`signal`] -- [`CancelPort`] trait and the shared [`StopSignal`].
//! - [`runner`] -- The round loop with cooperative cancellation.
//!
//! [`PairSelector`]: selection::PairSelector
//! [`TradeRule`]: trade::TradeRule
//! [`SimulationState`]: round::SimulationState
//! [`RenderPort`]: render::RenderPort
//! [`RoundFrame`]: render::RoundFrame
//! [`CancelPort`]: signal::CancelPort
//! [`StopSignal`]: signal::StopSignal

pub mod config;
pub mod render;
pub mod round;
pub mod runner;
pub mod selection;
pub mod signal;
pub mod trade;
