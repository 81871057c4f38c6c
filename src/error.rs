//! Error types for the resolution engine.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the resolution engine.
///
/// Only `InvalidUsage` and `NotSupported` are hard failures callers must
/// handle; every other resolution-time condition degrades to an empty or
/// lower-confidence result inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required parameter was missing or empty.
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    /// The requested operation is not supported on this backend.
    #[error("not supported: {0}")]
    NotSupported(&'static str),

    /// The input matched none of the known address shapes.
    ///
    /// Callers of the public API never see this variant; the orchestrator
    /// maps it to an empty result.
    #[error("unrecognized address shape")]
    ShapeUnrecognized,

    /// A storage backend failed while serving a lookup.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O failure while loading gazetteer data.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Malformed row in a flat-file gazetteer table.
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// Cache entry could not be serialized or deserialized.
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}
