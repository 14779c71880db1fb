//! Match configuration
//!
//! Every knob has a default, so an empty YAML document is a valid config:
//!
//! ```yaml
//! programLength: 24
//! copiesPerSource: 50
//! turnsPerGame: 5000
//! numberOfGames: 10
//! seed: 42            # omit for a fresh seed each run
//! progressInterval: 100
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the config YAML.
    #[error("failed to parse config YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A value is out of range.
    #[error("invalid config: {field} must be at least 1")]
    Zero { field: &'static str },
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for a whole match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Instructions per program
    pub program_length: usize,

    /// Bots placed per distinct source
    pub copies_per_source: usize,

    /// Scheduling rounds per game
    pub turns_per_game: u64,

    /// Independent games summed into the final score
    pub number_of_games: u64,

    /// Seed for the match random source; `None` draws one from entropy
    pub seed: Option<u64>,

    /// Turns between progress log lines
    pub progress_interval: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            program_length: 24,
            copies_per_source: 50,
            turns_per_game: 5000,
            number_of_games: 10,
            seed: None,
            progress_interval: 100,
        }
    }
}

impl MatchConfig {
    /// Load a config from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: MatchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave nothing to run.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.program_length == 0 {
            return Err(ConfigError::Zero {
                field: "programLength",
            });
        }
        if self.copies_per_source == 0 {
            return Err(ConfigError::Zero {
                field: "copiesPerSource",
            });
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::Zero {
                field: "progressInterval",
            });
        }
        Ok(())
    }

    pub fn with_program_length(mut self, program_length: usize) -> Self {
        self.program_length = program_length;
        self
    }

    pub fn with_copies(mut self, copies_per_source: usize) -> Self {
        self.copies_per_source = copies_per_source;
        self
    }

    pub fn with_turns(mut self, turns_per_game: u64) -> Self {
        self.turns_per_game = turns_per_game;
        self
    }

    pub fn with_games(mut self, number_of_games: u64) -> Self {
        self.number_of_games = number_of_games;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
