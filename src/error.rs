// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollabError {
    /// The store is empty or a required linkage is absent. Aborts the run
    /// before any write happens.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The regression could not be fitted. Reported, never a crash.
    #[error("Statistical fit failed: {reason}")]
    StatisticalFit { reason: String, guidance: String },

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid dataset: {0}")]
    Dataset(String),
}

pub type Result<T> = std::result::Result<T, CollabError>;

impl CollabError {
    pub(crate) fn fit(reason: impl Into<String>, guidance: impl Into<String>) -> Self {
        Self::StatisticalFit {
            reason: reason.into(),
            guidance: guidance.into(),
        }
    }

    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to CollabError::Io with unknown path.
impl From<std::io::Error> for CollabError {
    fn from(source: std::io::Error) -> Self {
        CollabError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<serde_json::Error> for CollabError {
    fn from(e: serde_json::Error) -> Self {
        CollabError::Dataset(e.to_string())
    }
}

impl From<toml::de::Error> for CollabError {
    fn from(e: toml::de::Error) -> Self {
        CollabError::Config(e.to_string())
    }
}
