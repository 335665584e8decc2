//! Error types for conversion

/// Conversion input could not be interpreted
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Raw input is not a JSON object
    #[error("conversion input must be a JSON object")]
    NotAnObject,

    /// Output could not be serialized
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
