// Configuration module for reading Snake.toml
//
// Only deployment concerns live here. Strategy thresholds are named constants
// in the strategy module so every replay reproduces the same decisions.

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub snake: SnakeConfig,
    pub timing: TimingConfig,
    pub replay: ReplayConfig,
}

/// Metadata reported to the arena
#[derive(Debug, Deserialize, Clone)]
pub struct SnakeConfig {
    pub name: String,
    pub color: String,
}

/// Per-tick timing
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Decisions slower than this are logged as warnings
    pub tick_budget_ms: u64,
}

/// Replay store
#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            snake: SnakeConfig {
                name: "LEE SNAKE".to_string(),
                color: "#00DEAD".to_string(),
            },
            timing: TimingConfig { tick_budget_ms: 100 },
            replay: ReplayConfig {
                enabled: false,
                log_file_path: "lee_snake_replay.jsonl".to_string(),
            },
        }
    }

    /// Loads Snake.toml, falling back to the hardcoded defaults
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("{}; using hardcoded configuration", e);
            Self::default_hardcoded()
        })
    }
}
