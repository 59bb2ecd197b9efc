//! Retention policies and the keep-or-purge decision.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::storage::{DeviceDir, PathError};

/// Per-tenant retention periods in days.
///
/// Tenant `0` supplies the default period. A tenant that is absent, or
/// present with a zero-day period, falls back to the default; if the default
/// itself is unset, resolution yields `0` (zero-day retention, not "retain
/// forever"). Built once at startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct RetentionTable {
    days: HashMap<u32, u32>,
}

impl RetentionTable {
    pub fn new(days: HashMap<u32, u32>) -> Self {
        Self { days }
    }

    /// Effective retention period for `tenant_id`.
    pub fn resolve(&self, tenant_id: u32) -> u32 {
        match self.days.get(&tenant_id).copied().unwrap_or(0) {
            0 => self.days.get(&0).copied().unwrap_or(0),
            days => days,
        }
    }
}

/// Decide whether the dated directory at `path` is still inside its
/// retention window on `now`'s UTC calendar day.
///
/// The path date plus `retention_days` is the expiry day; the directory is
/// kept while the expiry day has not passed. The boundary is inclusive:
/// `expiry == today` keeps, so a zero-day retention keeps a same-day
/// directory until midnight UTC.
///
/// Fails with [`PathError::DateParse`] when `path` does not reach down to a
/// terminal `YYYY/MM/DD` directory; callers treat that as "keep walking".
pub fn should_keep(
    now: DateTime<Utc>,
    dir: &DeviceDir,
    path: &str,
    retention_days: u32,
) -> Result<bool, PathError> {
    let day = dir.date_for(path)?;
    let expiry = day + Duration::days(i64::from(retention_days));
    Ok(expiry >= now.date_naive())
}
