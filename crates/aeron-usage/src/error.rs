use std::path::PathBuf;

/// Errors returned by the usage log
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// Reading or writing a log file failed
    #[error("usage log I/O failed for {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An entry could not be encoded
    #[error("failed to encode usage entry: {0}")]
    Encode(#[from] serde_json::Error),
}
