//! Error types for extraction
//!
//! Only structural failures surface here. Per-file problems are counted
//! in the report and per-line problems live in the parsed fragments.

use std::path::PathBuf;

/// Extraction failed as a whole
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem failure outside any single export file
    #[error("{}: {source}", path.display())]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Archive unreadable or not a zip
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Analysis root missing or not a directory
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Document store rejected an operation
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ExtractError {
    /// Attach the offending path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration problems
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Offending setting
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Document store failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backend not reachable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored value could not be (de)serialized
    #[error("corrupt entry for job '{0}'")]
    Corrupt(String),
}
