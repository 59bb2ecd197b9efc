//! Configuration for the reaper.
//!
//! The reaper is configured via a TOML file.
//!
//! # Example
//!
//! ```toml
//! [storage]
//! root = "/data/fb"
//!
//! [sweep]
//! timeout_secs = 1
//!
//! [retention]
//! default_days = 90
//!
//! [retention.tenants]
//! 1289 = 30
//! ```

mod retention;
mod seed;
mod sweep;

use std::path::Path;

use serde::Deserialize;

pub use retention::*;
pub use seed::*;
pub use sweep::*;

/// Root configuration file.
///
/// Only the storage root is mandatory; every other section has defaults that
/// match the behavior of a bare sweep.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReaperConfig {
    /// Storage tree to sweep and seed.
    pub storage: StorageSettings,

    /// Sweep behavior.
    #[serde(default)]
    pub sweep: SweepSettings,

    /// Per-tenant retention periods.
    #[serde(default)]
    pub retention: RetentionSettings,

    /// Synthetic-data generator settings.
    #[serde(default)]
    pub seed: SeedSettings,
}

impl ReaperConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ReaperConfig = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.root must not be empty".into(),
            ));
        }
        self.seed.validate().map_err(ConfigError::Validation)?;

        Ok(())
    }
}

/// Location of the storage tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSettings {
    /// Base path all tenant data lives under, e.g. `/data/fb`.
    pub root: String,
}

impl StorageSettings {
    /// Root with any trailing separator trimmed, so path parsing sees a
    /// clean prefix.
    pub fn normalized_root(&self) -> &str {
        if self.root.len() > 1 {
            self.root.trim_end_matches('/')
        } else {
            &self.root
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configuration validation error: {0}")]
    Validation(String),
}
