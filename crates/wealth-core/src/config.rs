//! Configuration loading and typed config structures for the wealth
//! exchange simulation.
//!
//! The optional configuration file is `wealth-config.yaml` in the working
//! directory. Every field has a default matching the reference economy
//! (10 agents, 100.0 each, 10 000 rounds, 20% gain, 17% loss), so an empty
//! or missing file yields a runnable simulation.
//!
//! Configuration is fixed once loaded; nothing here is mutated while the
//! simulation is running. [`SimulationConfig::validate`] rejects values
//! the trading model cannot run with before any round executes.

use std::path::Path;

use serde::Deserialize;

/// Environment variable overriding `simulation.seed`.
pub const SEED_ENV: &str = "WEALTH_SEED";

/// Environment variable overriding `simulation.round_limit`.
pub const ROUND_LIMIT_ENV: &str = "WEALTH_ROUND_LIMIT";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value was parsed but the simulation cannot run with it.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfiguration {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `wealth-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Population size and starting wealth.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Trading rule percentages.
    #[serde(default)]
    pub trade: TradeConfig,

    /// Round budget, pacing, and seeding.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Log level and destination.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `WEALTH_SEED` overrides `simulation.seed`
    /// - `WEALTH_ROUND_LIMIT` overrides `simulation.round_limit`
    ///
    /// The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidConfiguration`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied, for runs without a
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if an override is
    /// malformed or produces an invalid configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Does not consult the environment and does not validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Override values with process environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if a variable is set
    /// but is not a valid unsigned integer.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override values from an arbitrary key lookup.
    ///
    /// [`apply_env_overrides`](Self::apply_env_overrides) passes the
    /// process environment; tests pass a fixed map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if a value is present
    /// but is not a valid unsigned integer.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(SEED_ENV) {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration {
                    field: "simulation.seed",
                    reason: format!("{SEED_ENV}={raw:?} is not a u64: {e}"),
                }
            })?;
            self.simulation.seed = Some(seed);
        }
        if let Some(raw) = lookup(ROUND_LIMIT_ENV) {
            let limit = raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration {
                    field: "simulation.round_limit",
                    reason: format!("{ROUND_LIMIT_ENV}={raw:?} is not a u64: {e}"),
                }
            })?;
            self.simulation.round_limit = limit;
        }
        Ok(())
    }

    /// Check that the configuration describes a runnable economy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] if the population is
    /// smaller than two, the initial wealth is negative or not finite, or
    /// either trade percentage lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population.size < 2 {
            return Err(ConfigError::InvalidConfiguration {
                field: "population.size",
                reason: format!(
                    "at least two agents are needed to trade, got {}",
                    self.population.size
                ),
            });
        }

        let initial = self.population.initial_wealth;
        if !initial.is_finite() || initial < 0.0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "population.initial_wealth",
                reason: format!("must be a finite, non-negative amount, got {initial}"),
            });
        }

        check_percentage("trade.percent_gain", self.trade.percent_gain)?;
        check_percentage("trade.percent_loss", self.trade.percent_loss)?;
        Ok(())
    }
}

/// Reject percentages outside the closed unit interval (and NaN).
fn check_percentage(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidConfiguration {
            field,
            reason: format!("must lie in [0, 1], got {value}"),
        })
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents in the market.
    #[serde(default = "default_population_size")]
    pub size: usize,

    /// Wealth every agent starts with.
    #[serde(default = "default_initial_wealth")]
    pub initial_wealth: f64,
}

impl PopulationConfig {
    /// The largest balance any single agent could hold if every other
    /// agent traded away everything: `size * initial_wealth`.
    #[allow(clippy::cast_precision_loss)]
    pub fn max_possible_wealth(&self) -> f64 {
        self.size as f64 * self.initial_wealth
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            initial_wealth: default_initial_wealth(),
        }
    }
}

/// Trading rule configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeConfig {
    /// Share of the receiver's wealth transferred when the receiver is the
    /// poorer (or equally wealthy) party.
    #[serde(default = "default_percent_gain")]
    pub percent_gain: f64,

    /// Share of the sender's wealth transferred when the sender is the
    /// poorer party.
    #[serde(default = "default_percent_loss")]
    pub percent_loss: f64,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            percent_gain: default_percent_gain(),
            percent_loss: default_percent_loss(),
        }
    }
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of trading rounds to run (0 = run no rounds).
    #[serde(default = "default_round_limit")]
    pub round_limit: u64,

    /// Pause between rounds in milliseconds (0 = run flat out).
    #[serde(default)]
    pub round_interval_ms: u64,

    /// Seed for pair selection. `None` seeds from the wall clock.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            round_limit: default_round_limit(),
            round_interval_ms: 0,
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// File that receives log output while the chart owns the terminal.
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Write JSON lines instead of plain text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            json: false,
        }
    }
}

const fn default_population_size() -> usize {
    10
}

const fn default_initial_wealth() -> f64 {
    100.0
}

const fn default_round_limit() -> u64 {
    10_000
}

const fn default_percent_gain() -> f64 {
    0.20
}

const fn default_percent_loss() -> f64 {
    0.17
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_file() -> String {
    "wealth-sim.log".to_owned()
}
