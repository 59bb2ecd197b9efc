use thiserror::Error;

/// Per-path failures raised while mapping filesystem paths to storage
/// entities.
///
/// Every variant is recoverable at the walk level. The first three mean
/// "this node does not address a device, skip it"; [`PathError::DateParse`]
/// means "this node is above the day boundary, keep descending".
#[derive(Debug, Error)]
pub enum PathError {
    /// The configured storage root does not occur anywhere in the path.
    #[error("storage root {root:?} does not appear in {path:?}")]
    NotUnderRoot { root: String, path: String },

    /// Too few segments after the storage root to contain a tenant, device
    /// name, device number and the start of a date.
    #[error("path {path:?} is too shallow to contain a tenant and device")]
    TooShallow { path: String },

    /// A tenant or device-number segment did not parse as an integer.
    #[error("expected a numeric {field} segment in {path:?}, found {segment:?}")]
    BadSegment {
        field: &'static str,
        segment: String,
        path: String,
    },

    /// The trailing segments do not form a `YYYY/MM/DD` date.
    #[error("no date suffix in {path:?}: {reason}")]
    DateParse { path: String, reason: String },
}
