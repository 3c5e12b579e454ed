//! Input watcher: turns the first key press into a stop request.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, warn};
use wealth_core::signal::StopSignal;

/// Name of the watcher thread, visible in debuggers and panic messages.
const WATCHER_THREAD_NAME: &str = "input-watcher";

/// Why the watcher stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// A key was pressed and the stop was requested.
    KeyPressed,
    /// Reading terminal events failed; the stop was requested anyway.
    ReadFailed {
        /// Description of the read failure.
        message: String,
    },
    /// The event source ran dry without a key press.
    InputClosed,
}

/// Consume `events` until the first key press and signal `stop`.
///
/// Only key presses count: releases, repeats, resizes and mouse events are
/// ignored. A read error also signals `stop`, so the main task is never
/// left waiting on input that can no longer arrive.
pub fn watch_events<I>(events: I, stop: &StopSignal) -> WatchOutcome
where
    I: IntoIterator<Item = io::Result<Event>>,
{
    for event in events {
        match event {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                debug!(code = ?key.code, "Key pressed");
                stop.request_stop();
                return WatchOutcome::KeyPressed;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read terminal event");
                stop.request_stop();
                return WatchOutcome::ReadFailed {
                    message: e.to_string(),
                };
            }
        }
    }
    WatchOutcome::InputClosed
}

/// Spawn the watcher on its own OS thread, blocking on crossterm events.
///
/// # Errors
///
/// Returns the I/O error if the thread cannot be spawned.
pub fn spawn_key_watcher(stop: Arc<StopSignal>) -> io::Result<JoinHandle<WatchOutcome>> {
    thread::Builder::new()
        .name(WATCHER_THREAD_NAME.to_owned())
        .spawn(move || {
            let events = std::iter::from_fn(|| Some(event::read()));
            let outcome = watch_events(events, &stop);
            debug!(?outcome, "Input watcher exited");
            outcome
        })
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }))
    }

    #[test]
    fn first_press_signals_stop() {
        let stop = StopSignal::new();
        let events = vec![
            Ok(Event::Resize(80, 24)),
            key(KeyCode::Char('q'), KeyEventKind::Press),
            key(KeyCode::Char('x'), KeyEventKind::Press),
        ];

        assert_eq!(watch_events(events, &stop), WatchOutcome::KeyPressed);
        assert!(stop.is_stop_requested());
    }

    #[test]
    fn releases_and_other_events_are_ignored() {
        let stop = StopSignal::new();
        let events = vec![
            Ok(Event::FocusGained),
            key(KeyCode::Enter, KeyEventKind::Release),
            key(KeyCode::Enter, KeyEventKind::Repeat),
        ];

        assert_eq!(watch_events(events, &stop), WatchOutcome::InputClosed);
        assert!(!stop.is_stop_requested());
    }

    #[test]
    fn read_error_signals_stop() {
        let stop = StopSignal::new();
        let events = vec![Err(io::Error::other("tty gone"))];

        let outcome = watch_events(events, &stop);

        assert_eq!(
            outcome,
            WatchOutcome::ReadFailed {
                message: "tty gone".to_owned()
            }
        );
        assert!(stop.is_stop_requested());
    }

    #[test]
    fn already_stopped_signal_stays_stopped() {
        let stop = StopSignal::new();
        stop.request_stop();

        let outcome = watch_events(vec![key(KeyCode::Esc, KeyEventKind::Press)], &stop);

        assert_eq!(outcome, WatchOutcome::KeyPressed);
        assert!(stop.is_stop_requested());
    }
}
