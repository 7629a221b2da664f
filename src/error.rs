//! Error types for FitLock.
//!
//! Each concern gets its own enum so callers can decide how to surface it:
//! persistence failures become an alert, transition failures disable a control
//! or show a notice, and config/catalog errors abort startup.

use std::path::PathBuf;

use crate::models::FlowState;

/// Errors from the key-value persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for '{key}' is corrupt: {details}")]
    Corrupt { key: String, details: String },

    #[error("could not encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[cfg(test)]
    #[error("write rejected: {0}")]
    WriteRejected(String),
}

/// Errors loading the app catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog has no entries")]
    Empty,

    #[error("catalog lists '{0}' more than once")]
    DuplicateId(String),
}

/// Errors loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no home directory; pass --data-dir")]
    NoHomeDir,
}

/// Errors starting the rep capture pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("pose replay file {0} does not exist")]
    ReplayMissing(PathBuf),

    #[error("{0} is already running")]
    AlreadyRunning(&'static str),

    #[error("no async runtime available to run {0}")]
    NoRuntime(&'static str),
}

/// A flow transition whose guard failed. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("select at least one app first")]
    EmptySelection,

    #[error("Please grant camera permission to start workout")]
    CameraDenied,

    #[error("still waiting for camera permission")]
    CameraPending,

    #[error("'{action}' is not available from the {from:?} step")]
    NotAllowed { from: FlowState, action: &'static str },
}
