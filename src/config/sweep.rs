//! Sweep behavior configuration.

use std::time::Duration;

use serde::Deserialize;

/// Controls for the sweep pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepSettings {
    /// Wall-clock budget for one walk, in seconds. A walk that runs out of
    /// budget ends cleanly; undecided directories are left for the next
    /// scheduled run.
    /// Default: 1
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log expired directories instead of deleting them.
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    1
}

impl SweepSettings {
    /// Get the walk budget as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
