//! Tenant-addressed storage directories.
//!
//! Every producer under a storage root follows the layout
//! `<root>/<tenant>/<device-name>/<device-number>/<YYYY>/<MM>/<DD>`, with
//! the date given as zero-padded UTC calendar fields. [`DeviceDir`] is the
//! parsed form of one device subtree and owns the conversions between dated
//! paths and calendar dates.

mod error;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

pub use error::PathError;

/// Layout of dates under a device directory, e.g. `2015/08/11`.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// One tenant-owned device subtree, e.g. `/data/fb/1289/j1_readnews_com/2466`.
///
/// Constructed per visited path during a sweep and discarded afterwards. The
/// seeder constructs the same type synthetically when laying out new storage
/// paths, so both sides share the naming contract by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDir {
    /// Storage root the subtree lives under, e.g. `/data/fb`.
    pub base: String,
    /// Owning tenant. Tenant `0` is reserved for the default retention
    /// policy and never owns data.
    pub tenant_id: u32,
    /// Opaque device label, e.g. `j1_readnews_com`. No uniqueness implied.
    pub device_name: String,
    /// Secondary device identifier; its only meaning is path composition.
    pub device_number: u32,
}

impl DeviceDir {
    pub fn new(
        base: impl Into<String>,
        tenant_id: u32,
        device_name: impl Into<String>,
        device_number: u32,
    ) -> Self {
        Self {
            base: base.into(),
            tenant_id,
            device_name: device_name.into(),
            device_number,
        }
    }

    /// Parse `path` into the device directory it belongs to.
    ///
    /// Locates `storage_root` as a substring of `path`, then reads the
    /// tenant, device name and device number from the next three segments.
    /// The remainder after the root keeps its leading separator, so the
    /// first split field is empty and at least four fields must be present.
    ///
    /// All failures are per-path and recoverable: the walk treats them as
    /// "not a decision point" and moves on.
    pub fn parse(storage_root: &str, path: &str) -> Result<Self, PathError> {
        let Some(at) = path.find(storage_root) else {
            return Err(PathError::NotUnderRoot {
                root: storage_root.to_string(),
                path: path.to_string(),
            });
        };

        let tail = &path[at + storage_root.len()..];
        let fields: Vec<&str> = tail.split('/').collect();
        if fields.len() < 4 {
            return Err(PathError::TooShallow {
                path: path.to_string(),
            });
        }

        Ok(Self {
            base: storage_root.to_string(),
            tenant_id: parse_segment(fields[1], "tenant", path)?,
            device_name: fields[2].to_string(),
            device_number: parse_segment(fields[3], "device number", path)?,
        })
    }

    /// Path of the dated directory for `at`, using its UTC calendar fields
    /// and discarding the time of day.
    pub fn path_for(&self, at: DateTime<Utc>) -> PathBuf {
        PathBuf::from(&self.base)
            .join(self.tenant_id.to_string())
            .join(&self.device_name)
            .join(self.device_number.to_string())
            .join(at.date_naive().format(DATE_FORMAT).to_string())
    }

    /// Calendar date encoded in the suffix of `path`.
    ///
    /// Strips everything up to and including the last
    /// `<device-name>/<device-number>/` occurrence, then parses the
    /// remainder strictly against [`DATE_FORMAT`]. Both deeper suffixes
    /// (e.g. an hour/minute level) and truncated ones fail, which is the
    /// expected signal for "not a terminal date directory".
    pub fn date_for(&self, path: &str) -> Result<NaiveDate, PathError> {
        let marker = format!("{}/{}/", self.device_name, self.device_number);
        let suffix = match path.rfind(&marker) {
            Some(at) => &path[at + marker.len()..],
            None => {
                return Err(PathError::DateParse {
                    path: path.to_string(),
                    reason: format!("no {marker:?} prefix to strip"),
                });
            }
        };

        NaiveDate::parse_from_str(suffix, DATE_FORMAT).map_err(|err| PathError::DateParse {
            path: path.to_string(),
            reason: err.to_string(),
        })
    }
}

fn parse_segment(segment: &str, field: &'static str, path: &str) -> Result<u32, PathError> {
    segment.parse().map_err(|_| PathError::BadSegment {
        field,
        segment: segment.to_string(),
        path: path.to_string(),
    })
}
