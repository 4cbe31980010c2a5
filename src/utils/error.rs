use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type BackupResult<T> = Result<T, BackupError>;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Remote fetch failed for {url}: {reason}")]
    RemoteFetch { url: String, reason: String },
    #[error("Remote write failed for {url}: {reason}")]
    RemoteWrite { url: String, reason: String },
    #[error("I/O error while {context} ({path}): {source}")]
    Storage {
        context: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    #[error("Run exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

impl BackupError {
    pub fn storage(context: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackupError::Storage {
            context: context.into(),
            path: path.into(),
            source,
        }
    }

    pub fn remote_fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        BackupError::RemoteFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn remote_write(url: impl Into<String>, reason: impl ToString) -> Self {
        BackupError::RemoteWrite {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
