//! Configuration types for the marbles engine.
//!
//! The configuration is a JSON file that can override the seed timelines of
//! the built-in demos and tune the interactive editor.

use crate::event::TimedEvent;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "marbles.json";

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed overrides, one entry per operator.
    #[serde(default)]
    pub demos: Vec<DemoConfig>,

    /// Operator selected when the UI starts.
    #[serde(default)]
    pub initial_operator: Option<String>,

    /// Time step used when nudging a marble from the keyboard.
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f64,

    /// Width of text lanes, in columns.
    #[serde(default = "default_lane_width")]
    pub lane_width: usize,
}

fn default_nudge_step() -> f64 {
    0.05
}

fn default_lane_width() -> usize {
    60
}

/// Seed timelines for one operator demo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Registered operator name, e.g. `zip`.
    pub operator: String,

    /// One event list per operator source, in source order.
    pub sources: Vec<Vec<TimedEvent<String>>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults if the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Get the demo override for an operator.
    pub fn get_demo(&self, operator: &str) -> Option<&DemoConfig> {
        self.demos.iter().find(|demo| demo.operator == operator)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demos: Vec::new(),
            initial_operator: None,
            nudge_step: default_nudge_step(),
            lane_width: default_lane_width(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
