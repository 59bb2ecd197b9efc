//! Synthetic-data generator configuration.
//!
//! # Example
//!
//! ```toml
//! [seed]
//! dirs_per_device = 100
//! files_per_dir = 50
//! span_days = 30
//!
//! [[seed.devices]]
//! tenant = 1289
//! number = 2466
//! name = "j1_readnews_com"
//! ```

use serde::Deserialize;

/// Controls for the `seed` subcommand.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSettings {
    /// Dated directories to create per device.
    /// Default: 100
    #[serde(default = "default_dirs_per_device")]
    pub dirs_per_device: u32,

    /// Empty `.dat` files to create in each dated directory.
    /// Default: 50
    #[serde(default = "default_files_per_dir")]
    pub files_per_dir: u32,

    /// Directory dates are drawn uniformly from the past this many days.
    /// Default: 30
    #[serde(default = "default_span_days")]
    pub span_days: u32,

    /// Devices to lay out under the storage root.
    #[serde(default)]
    pub devices: Vec<SeedDevice>,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            dirs_per_device: default_dirs_per_device(),
            files_per_dir: default_files_per_dir(),
            span_days: default_span_days(),
            devices: Vec::new(),
        }
    }
}

fn default_dirs_per_device() -> u32 {
    100
}

fn default_files_per_dir() -> u32 {
    50
}

fn default_span_days() -> u32 {
    30
}

/// One device to generate data for.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedDevice {
    /// Owning tenant id. Must not be `0`, which is reserved for the default
    /// retention policy.
    pub tenant: u32,

    /// Device number, e.g. `2466`.
    pub number: u32,

    /// Device name, e.g. `j1_readnews_com`.
    pub name: String,
}

impl SeedSettings {
    pub(crate) fn validate(&self) -> Result<(), String> {
        for device in &self.devices {
            if device.tenant == 0 {
                return Err(format!(
                    "seed device {:?} uses tenant 0, which is reserved for the default retention policy",
                    device.name
                ));
            }
        }

        Ok(())
    }
}
