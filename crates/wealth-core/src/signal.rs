//! One-shot stop signal shared between the simulation and input threads.
//!
//! The simulation thread polls [`CancelPort::is_cancelled`] once per round
//! without blocking. The input watcher calls [`StopSignal::request_stop`]
//! when it sees a key press. After the round loop returns, the main task
//! awaits [`StopSignal::wait`] so the final chart stays on screen until the
//! user dismisses it.
//!
//! # Architecture
//!
//! The flag is an [`AtomicBool`] so the per-round poll is lock-free. A
//! [`Notify`] wakes the single async waiter. The flag never resets;
//! signalling twice is the same as signalling once.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tracing::info;

/// Non-blocking view of a cancellation flag.
///
/// The round loop only needs to ask "has a stop been requested?"; anything
/// that can answer that can drive it.
pub trait CancelPort: Send + Sync {
    /// Whether cancellation has been signalled. Must not block.
    fn is_cancelled(&self) -> bool;
}

/// Set-once, read-many stop flag.
#[derive(Debug, Default)]
pub struct StopSignal {
    /// Whether a stop has been requested.
    stopped: AtomicBool,

    /// Wakes [`wait`](Self::wait) when the flag is set.
    notify: Notify,
}

impl StopSignal {
    /// Create an unsignalled stop flag.
    pub fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Request a stop.
    ///
    /// Returns `true` if this call set the flag and `false` if it was
    /// already set.
    pub fn request_stop(&self) -> bool {
        let first = !self.stopped.swap(true, Ordering::AcqRel);
        if first {
            info!("Stop requested");
            self.notify.notify_waiters();
        }
        first
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Wait until a stop has been requested.
    ///
    /// Returns immediately if the flag is already set.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent request_stop cannot
            // slip between the check and the await.
            notified.as_mut().enable();
            if self.is_stop_requested() {
                return;
            }
            notified.await;
        }
    }
}

impl CancelPort for StopSignal {
    fn is_cancelled(&self) -> bool {
        self.is_stop_requested()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn initial_state_is_not_stopped() {
        let signal = StopSignal::new();
        assert!(!signal.is_stop_requested());
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn request_stop_is_idempotent() {
        let signal = StopSignal::new();
        assert!(signal.request_stop());
        assert!(!signal.request_stop());
        assert!(!signal.request_stop());
        assert!(signal.is_stop_requested());
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_stopped() {
        let signal = StopSignal::new();
        signal.request_stop();
        let waited = tokio::time::timeout(Duration::from_secs(1), signal.wait()).await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn wait_wakes_on_stop_from_another_thread() {
        let signal = Arc::new(StopSignal::new());
        let remote = Arc::clone(&signal);

        let watcher = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.request_stop();
        });

        let waited = tokio::time::timeout(Duration::from_secs(5), signal.wait()).await;
        assert!(waited.is_ok(), "wait did not observe the stop");
        assert!(watcher.join().is_ok());
    }

    #[tokio::test]
    async fn wait_stays_pending_without_stop() {
        let signal = StopSignal::new();
        let waited = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;
        assert!(waited.is_err());
    }
}
