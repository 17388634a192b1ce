//! Engine configuration loaded from TOML.
//!
//! A missing file or key keeps the compiled default; a file that fails to
//! parse is reported and ignored by [`EngineConfig::load_or_default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use stellar_logic::balance::BalanceConfig;
use stellar_logic::constants::MAX_FRAME_DELTA_MS;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub autosave_interval_ms: f64,
    pub income_interval_ms: f64,
    pub max_frame_delta_ms: f64,
    /// Fixed RNG seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
    pub balance: BalanceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1200.0,
            viewport_height: 680.0,
            autosave_interval_ms: 15_000.0,
            income_interval_ms: 1000.0,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            seed: None,
            balance: BalanceConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded engine config");
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using compiled defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "bad config, using compiled defaults");
                Self::default()
            }
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
