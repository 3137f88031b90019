use std::path::PathBuf;

use thiserror::Error;

/// Failures at the fetch-document boundary.
///
/// These never abort a cycle: the merge stage logs them and emits an empty batch.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read feed document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in feed document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("feed document {} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}
