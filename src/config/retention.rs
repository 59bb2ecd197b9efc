//! Retention period configuration.
//!
//! # Example
//!
//! ```toml
//! [retention]
//! default_days = 90
//!
//! [retention.tenants]
//! 1289 = 30
//! 4321 = 7
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use crate::retention::RetentionTable;

/// Per-tenant retention periods.
///
/// Tenants not listed here, and tenants listed with `0`, fall back to
/// `default_days`. A `default_days` of `0` means zero-day retention, not
/// "retain forever".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionSettings {
    /// Days to keep dated directories for tenants without their own period.
    /// Default: 0
    #[serde(default)]
    pub default_days: u32,

    /// Days to keep dated directories, per tenant id.
    #[serde(default, deserialize_with = "tenant_keys")]
    pub tenants: HashMap<u32, u32>,
}

impl RetentionSettings {
    /// Build the immutable lookup table the sweep reads from. The default
    /// period is stored under the reserved tenant `0`.
    pub fn table(&self) -> RetentionTable {
        let mut days = self.tenants.clone();
        if self.default_days > 0 {
            days.insert(0, self.default_days);
        }
        RetentionTable::new(days)
    }
}

/// TOML table keys are strings; tenant ids are numeric. Parse them up front
/// so a typo fails at load time instead of silently never matching.
fn tenant_keys<'de, D>(deserializer: D) -> Result<HashMap<u32, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, u32>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, days)| {
            key.parse::<u32>().map(|tenant| (tenant, days)).map_err(|_| {
                serde::de::Error::custom(format!(
                    "tenant id {key:?} is not a non-negative integer"
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_stores_the_default_under_tenant_zero() {
        let settings: RetentionSettings = toml::from_str(
            r#"
            default_days = 90

            [tenants]
            1289 = 30
        "#,
        )
        .unwrap();

        let table = settings.table();
        assert_eq!(table.resolve(1289), 30);
        assert_eq!(table.resolve(555), 90);
        assert_eq!(table.resolve(0), 90);
    }

    #[test]
    fn unset_default_leaves_resolution_at_zero() {
        let settings: RetentionSettings = toml::from_str(
            r#"
            [tenants]
            1289 = 30
        "#,
        )
        .unwrap();

        let table = settings.table();
        assert_eq!(table.resolve(1289), 30);
        assert_eq!(table.resolve(555), 0);
    }

    #[test]
    fn rejects_non_numeric_tenant_key() {
        let err = toml::from_str::<RetentionSettings>(
            r#"
            [tenants]
            acme = 30
        "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("acme"), "{err}");
    }
}
