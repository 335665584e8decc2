//! Converter configuration

use serde::{Deserialize, Serialize};

/// Conversion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Title used when the source names no project
    pub fallback_title: String,
    /// Value of `metadata.source`
    pub source_label: String,
    /// Validate the produced document
    pub validate_output: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            fallback_title: "Converted from SAPHIRE".to_string(),
            source_label: "SAPHIRE Import".to_string(),
            validate_output: true,
        }
    }
}

impl ConverterConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With fallback title
    #[inline]
    #[must_use]
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = title.into();
        self
    }

    /// With source label
    #[inline]
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// With output validation on or off
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_output = validate;
        self
    }
}
