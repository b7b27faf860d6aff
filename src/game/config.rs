use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

const DEFAULT_RESOLUTION_DELAY_MS: u64 = 1000;
const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// How long a revealed pair stays up before it is judged.
    pub resolution_delay_ms: u64,
    /// Period of the elapsed-time counter when a host drives it.
    pub tick_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            resolution_delay_ms: DEFAULT_RESOLUTION_DELAY_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tick_interval_ms == 0 {
            return Err(EngineError::Config(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolution_delay(&self) -> Duration {
        Duration::from_millis(self.resolution_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
