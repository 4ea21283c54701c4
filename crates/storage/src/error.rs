use std::path::PathBuf;

use rust_decimal::Decimal;

/// Errors returned by [`crate::AssetPool`] mutations.
///
/// Lookups never fail with an error: an unknown id is reported as `None`
/// or `false`. Only writes to disk and invalid input surface here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file or its directory could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection could not be serialized.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value passed as idea fields did not encode to a JSON object.
    #[error("idea fields must encode to a JSON object: {0}")]
    IdeaFields(#[source] serde_json::Error),

    /// Revenue amounts must be zero or positive.
    #[error("revenue amount must not be negative (got {0})")]
    NegativeAmount(Decimal),
}
