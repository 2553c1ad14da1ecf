//! Front-end configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tictac_engine::{Difficulty, Player};
use tictac_online::DEFAULT_GAME_ID;
use tracing::{debug, info, instrument};

/// Settings read from `tictac.toml`.
///
/// Every field is optional in the file; command-line flags win over
/// whatever the file sets.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// AI difficulty for local games.
    #[serde(default)]
    difficulty: Difficulty,

    /// Mark the human plays in local games.
    #[serde(default = "default_mark")]
    mark: Player,

    /// AI thinking delay after a human move, in milliseconds.
    #[serde(default = "default_think_ms")]
    think_ms: u64,

    /// AI thinking delay before an opening move, in milliseconds.
    #[serde(default = "default_opening_think_ms")]
    opening_think_ms: u64,

    /// Game id used by online mode.
    #[serde(default = "default_game_id")]
    game_id: String,
}

fn default_mark() -> Player {
    Player::X
}

fn default_think_ms() -> u64 {
    700
}

fn default_opening_think_ms() -> u64 {
    500
}

fn default_game_id() -> String {
    DEFAULT_GAME_ID.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            mark: default_mark(),
            think_ms: default_think_ms(),
            opening_think_ms: default_opening_think_ms(),
            game_id: default_game_id(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(difficulty = %config.difficulty, mark = %config.mark, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        difficulty: Option<Difficulty>,
        mark: Option<Player>,
        think_ms: Option<u64>,
        game_id: Option<String>,
    ) -> Self {
        if let Some(difficulty) = difficulty {
            self.difficulty = difficulty;
        }
        if let Some(mark) = mark {
            self.mark = mark;
        }
        if let Some(think_ms) = think_ms {
            self.think_ms = think_ms;
            self.opening_think_ms = think_ms;
        }
        if let Some(game_id) = game_id {
            self.game_id = game_id;
        }
        self
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
