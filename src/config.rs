//! Timings used by the demo scenarios.

use core::time::Duration;
use std::{fs, path::Path};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Delays for each scenario, in milliseconds. Missing keys keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timings {
    /// Simulated work done by the first operation.
    pub step_delay_ms: u64,
    pub race_a_ms: u64,
    pub race_b_ms: u64,
    /// How long the cancellable delay wants to wait.
    pub delay_ms: u64,
    /// When the cancellable delay gives up.
    pub timeout_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            step_delay_ms: 2_000,
            race_a_ms: 50,
            race_b_ms: 5,
            delay_ms: 10_000,
            timeout_ms: 1_000,
        }
    }
}

impl Timings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn race_a(&self) -> Duration {
        Duration::from_millis(self.race_a_ms)
    }

    pub fn race_b(&self) -> Duration {
        Duration::from_millis(self.race_b_ms)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
