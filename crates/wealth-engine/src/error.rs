//! Error types for the wealth engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup, the run, and
//! teardown so `main` can propagate with `?` and exit non-zero.

/// Top-level error for the wealth engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: wealth_core::config::ConfigError,
    },

    /// The simulation loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: wealth_core::runner::RunnerError,
    },

    /// Drawing outside the round loop failed.
    #[error("render error: {source}")]
    Render {
        /// The underlying render error.
        #[from]
        source: wealth_core::render::RenderError,
    },

    /// The terminal could not be put into chart mode.
    #[error("terminal error: {message}")]
    Terminal {
        /// Description of the terminal failure.
        message: String,
    },

    /// The input watcher thread could not be started.
    #[error("input watcher error: {message}")]
    Watcher {
        /// Description of the watcher failure.
        message: String,
    },

    /// The log file or filter could not be set up.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },

    /// The blocking simulation task panicked or was cancelled.
    #[error("simulation task error: {message}")]
    Task {
        /// Description of the task failure.
        message: String,
    },
}
