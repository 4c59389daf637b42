//! Error types for the I/O edges of the router.
//!
//! The routing pipeline itself (`classify`, `select_tools`, `route`,
//! `hooks_for`, `plan`) has no error path: every stage degrades to a default.
//! Errors only exist where configuration is loaded or history is written.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// History file failures
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Umbrella error for router construction
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("invalid pattern for {task_type}: {source}")]
    Pattern {
        task_type: crate::types::TaskType,
        #[source]
        source: regex::Error,
    },
}

/// Result type for router construction
pub type RouterResult<T> = Result<T, RouterError>;
