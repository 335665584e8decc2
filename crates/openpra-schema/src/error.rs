//! Error types for OpenPRA schema handling

use crate::version::{SchemaVersion, UnsupportedVersion};
use std::path::PathBuf;

/// Document does not conform to its declared schema version
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Top-level key absent
    #[error("missing required key: {key}")]
    MissingKey {
        /// Absent key
        key: &'static str,
    },

    /// Key present with the wrong JSON type
    #[error("{field} must be {expected}")]
    WrongType {
        /// Offending field path
        field: String,
        /// Expected JSON type
        expected: &'static str,
    },

    /// Declared version is not supported
    #[error(transparent)]
    Unsupported(#[from] UnsupportedVersion),

    /// Entry of a model list is malformed
    #[error("{kind} at index {index} {reason}")]
    InvalidModel {
        /// Model list, e.g. `fault tree`
        kind: &'static str,
        /// Position in the list
        index: usize,
        /// What is wrong
        reason: String,
    },

    /// Gate type outside the recognized kinds
    #[error("fault tree '{tree}' gate '{gate}' has invalid type '{gate_type}'")]
    InvalidGateType {
        /// Fault-tree id
        tree: String,
        /// Gate id
        gate: String,
        /// Offending token
        gate_type: String,
    },

    /// Typed document could not be turned into JSON
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Source entry left out of the document
    #[error("input entry {location} was skipped: {reason}")]
    SkippedInput {
        /// Where the entry sat in the source
        location: String,
        /// Why it could not be read
        reason: String,
    },
}

impl SchemaError {
    /// Create wrong-type error
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }

    /// Create malformed-model error
    pub fn invalid_model(kind: &'static str, index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            kind,
            index,
            reason: reason.into(),
        }
    }
}

/// Upgrade could not be performed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    /// Source carries no version string
    #[error("source document has no version")]
    MissingVersion,

    /// Source is not a JSON object
    #[error("source document must be an object")]
    NotAnObject,

    /// Source or target version unknown
    #[error(transparent)]
    Unsupported(#[from] UnsupportedVersion),

    /// No chain of steps connects the versions
    #[error("No upgrade path from {from} to {to}")]
    NoUpgradePath {
        /// Source version
        from: SchemaVersion,
        /// Requested version
        to: SchemaVersion,
    },
}

/// Loading or saving a document failed
#[derive(Debug, thiserror::Error)]
pub enum SchemaIoError {
    /// Filesystem failure
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Automatic upgrade failed
    #[error("upgrade failed: {0}")]
    Upgrade(#[from] UpgradeError),

    /// Document failed validation
    #[error("invalid document: {0}")]
    Invalid(#[from] SchemaError),
}

impl SchemaIoError {
    /// Attach the offending path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
