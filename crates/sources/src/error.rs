/// Why a collector produced nothing.
///
/// Collectors never propagate these past [`crate::FetchOutcome`]; they are
/// kept so callers can report which source failed and how.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Connection, DNS or TLS failure.
    #[error("{source_id}: request failed: {message}")]
    Request { source_id: String, message: String },

    /// The upstream answered with a non-success status.
    #[error("{source_id}: upstream returned HTTP {status}")]
    Status { source_id: String, status: u16 },

    #[error("{source_id}: timed out after {secs}s")]
    Timeout { source_id: String, secs: u64 },

    /// The body was not the expected shape.
    #[error("{source_id}: could not parse response: {message}")]
    Parse { source_id: String, message: String },

    /// A command-backed source could not run or exited unsuccessfully.
    #[error("{source_id}: command failed: {message}")]
    Command { source_id: String, message: String },

    #[error("not a GitHub repository URL: '{0}'")]
    InvalidUrl(String),
}

impl SourceError {
    pub(crate) fn parse(source_id: &str, message: impl Into<String>) -> Self {
        SourceError::Parse {
            source_id: source_id.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn command(source_id: &str, message: impl Into<String>) -> Self {
        SourceError::Command {
            source_id: source_id.to_string(),
            message: message.into(),
        }
    }
}
