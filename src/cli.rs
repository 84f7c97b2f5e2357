//! Command-line interface for sudoku_live.

use clap::Parser;
use sudoku_live::puzzle::Difficulty;
use sudoku_live::{Config, ConfigError};

/// Sudoku Live - one shared sudoku round for every connected player
#[derive(Parser, Debug)]
#[command(name = "sudoku_live")]
#[command(about = "Collaborative sudoku server speaking JSON on stdin, HTML fragments on stdout", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Round length in minutes
    #[arg(long)]
    pub round_minutes: Option<i64>,

    /// Seconds between progress evaluations
    #[arg(long)]
    pub check_interval_secs: Option<f64>,

    /// Seconds between a finished round and the next one
    #[arg(long)]
    pub restart_delay_secs: Option<f64>,

    /// Puzzle difficulty (easy, medium, hard, expert)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Fixed generator seed for reproducible rounds
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Resolves the effective configuration: file values where a file is
    /// given, defaults otherwise, command-line flags overriding both.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(minutes) = self.round_minutes {
            config.set_round_minutes(minutes);
        }
        if let Some(secs) = self.check_interval_secs {
            config.set_check_interval_secs(secs);
        }
        if let Some(secs) = self.restart_delay_secs {
            config.set_restart_delay_secs(secs);
        }
        if let Some(difficulty) = self.difficulty {
            config.set_difficulty(difficulty);
        }
        if let Some(seed) = self.seed {
            config.set_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}
