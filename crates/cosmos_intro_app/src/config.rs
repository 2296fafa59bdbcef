// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application configuration, stored as RON.

use crate::host::HostConfig;
use crate::scene::SceneConfig;
use cosmos_intro_sequencer::SequencerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for [`HeroConfig`]
    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Configuration could not be serialized
    #[error("Config serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Values parse but cannot run
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything the hero page needs to run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// Terminal animation and interaction
    pub sequencer: SequencerConfig,
    /// Scene composition
    pub scene: SceneConfig,
    /// Headless host
    pub host: HostConfig,
}

impl HeroConfig {
    /// Parse from a RON string and validate
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sequencer
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.host.validate()
    }
}
