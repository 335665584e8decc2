//! Extraction configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default size cap for a single export file (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extraction settings
///
/// Every field has a default, so a TOML file only lists what it changes:
///
/// ```toml
/// max_file_size = 1048576
/// lossy_decoding = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Files larger than this are recorded but not parsed
    pub max_file_size: u64,
    /// Replace invalid UTF-8 instead of skipping the file
    pub lossy_decoding: bool,
    /// Exact file names never visited
    pub skip_names: Vec<String>,
    /// File-name prefixes never visited (AppleDouble resource forks)
    pub skip_prefixes: Vec<String>,
    /// Directory name whose whole subtree is ignored
    pub metadata_dir_marker: String,
    /// Prefix for temporary extraction directories
    pub temp_prefix: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            lossy_decoding: true,
            skip_names: vec![".DS_Store".to_string()],
            skip_prefixes: vec!["._".to_string()],
            metadata_dir_marker: "__MACOSX".to_string(),
            temp_prefix: "saphire_extract_".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With file size cap
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// With lossy decoding on or off
    #[inline]
    #[must_use]
    pub fn with_lossy_decoding(mut self, lossy: bool) -> Self {
        self.lossy_decoding = lossy;
        self
    }

    /// With temporary directory prefix
    #[inline]
    #[must_use]
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    /// With an extra skipped file name
    #[must_use]
    pub fn with_skip_name(mut self, name: impl Into<String>) -> Self {
        self.skip_names.push(name.into());
        self
    }

    /// Parse from TOML text and check ranges
    ///
    /// # Errors
    /// Malformed TOML or a zero size cap.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Unreadable file or see [`ExtractConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `max_file_size` of zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid {
                field: "max_file_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Whether a file with this name is never visited
    #[must_use]
    pub fn skips_file_name(&self, name: &str) -> bool {
        self.skip_names.iter().any(|n| n == name)
            || self.skip_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Whether a directory with this name is pruned with its subtree
    ///
    /// Any name containing the marker matches, so `x__MACOSX` is pruned too.
    #[must_use]
    pub fn skips_dir_name(&self, name: &str) -> bool {
        !self.metadata_dir_marker.is_empty() && name.contains(&self.metadata_dir_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ExtractConfig::new();
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert!(config.lossy_decoding);
        assert!(config.skips_file_name(".DS_Store"));
        assert!(config.skips_file_name("._HTGR.FAD"));
        assert!(!config.skips_file_name("HTGR.FAD"));
        assert!(config.skips_dir_name("__MACOSX"));
    }

    #[test]
    fn metadata_marker_matches_inside_names() {
        let config = ExtractConfig::new();
        assert!(config.skips_dir_name("__MACOSX"));
        assert!(config.skips_dir_name("old__MACOSX_copy"));
        assert!(!config.skips_dir_name("MACOSX"));
        assert!(!config.skips_dir_name("HTGR"));

        let unmarked = ExtractConfig {
            metadata_dir_marker: String::new(),
            ..ExtractConfig::new()
        };
        assert!(!unmarked.skips_dir_name("__MACOSX"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ExtractConfig::from_toml_str("lossy_decoding = false\n").unwrap();
        assert_eq!(
            config,
            ExtractConfig::new().with_lossy_decoding(false)
        );
    }

    #[test]
    fn zero_size_cap_is_rejected() {
        let err = ExtractConfig::from_toml_str("max_file_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_file_size", .. }));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(matches!(
            ExtractConfig::from_toml_str("max_file_size = \"big\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extract.toml");
        std::fs::write(&path, "temp_prefix = \"job_\"\nskip_names = [\"Thumbs.db\"]\n").unwrap();

        let config = ExtractConfig::load(&path).unwrap();
        assert_eq!(config.temp_prefix, "job_");
        assert!(config.skips_file_name("Thumbs.db"));
        assert!(!config.skips_file_name(".DS_Store"));

        assert!(matches!(
            ExtractConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
