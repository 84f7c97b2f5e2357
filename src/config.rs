//! Runtime configuration for the session server.

use crate::puzzle::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Tunable round parameters, loadable from a TOML file with every field
/// optional.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct Config {
    /// Length of a round in minutes.
    #[serde(default = "default_round_minutes")]
    round_minutes: i64,

    /// Seconds between progress evaluations.
    #[serde(default = "default_check_interval_secs")]
    check_interval_secs: f64,

    /// Seconds between a finished round and the next one.
    #[serde(default = "default_restart_delay_secs")]
    restart_delay_secs: f64,

    /// Puzzle difficulty for generated rounds.
    #[serde(default)]
    difficulty: Difficulty,

    /// Fixed generator seed for reproducible rounds.
    #[serde(default)]
    seed: Option<u64>,
}

fn default_round_minutes() -> i64 {
    10
}

fn default_check_interval_secs() -> f64 {
    2.5
}

fn default_restart_delay_secs() -> f64 {
    5.0
}

impl Config {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(
            round_minutes = config.round_minutes,
            difficulty = %config.difficulty,
            "config loaded"
        );
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_minutes <= 0 {
            return Err(ConfigError::new(
                "round_minutes must be positive".to_string(),
            ));
        }
        if self.check_interval_secs <= 0.0 {
            return Err(ConfigError::new(
                "check_interval_secs must be positive".to_string(),
            ));
        }
        if self.restart_delay_secs < 0.0 {
            return Err(ConfigError::new(
                "restart_delay_secs must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Round length as a duration.
    pub fn round_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.round_minutes)
    }

    /// Evaluation cadence as a duration.
    pub fn check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.check_interval_secs)
    }

    /// Restart delay as a duration.
    pub fn restart_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.restart_delay_secs)
    }

    /// Overrides the round length in minutes.
    pub fn set_round_minutes(&mut self, minutes: i64) {
        self.round_minutes = minutes;
    }

    /// Overrides the evaluation cadence in seconds.
    pub fn set_check_interval_secs(&mut self, secs: f64) {
        self.check_interval_secs = secs;
    }

    /// Overrides the restart delay in seconds.
    pub fn set_restart_delay_secs(&mut self, secs: f64) {
        self.restart_delay_secs = secs;
    }

    /// Overrides the puzzle difficulty.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Overrides the generator seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_minutes: default_round_minutes(),
            check_interval_secs: default_check_interval_secs(),
            restart_delay_secs: default_restart_delay_secs(),
            difficulty: Difficulty::default(),
            seed: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
