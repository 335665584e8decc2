//! Format parsers for SAPHIRE text exports
//!
//! Every parser is a pure function from file text to a [`Fragment`]:
//! - never panics, for any input
//! - strips leading BOMs before splitting lines
//! - records malformed lines in `Fragment::errors` and keeps going

use crate::classify::{extension_of, LegacyFormat};
use crate::fragment::Fragment;
use once_cell::sync::Lazy;
use std::path::Path;

mod bei;
mod esd;
pub mod etl;
mod fad;
mod ftl;
mod json;
mod mard;
mod sql;
mod sqd;
mod stl;

pub use bei::{parse_bei, BeiParser};
pub use esd::{parse_esd, EsdParser};
pub use etl::{parse_etl, EtlParser};
pub use fad::{parse_fad, FadParser};
pub use ftl::{parse_ftl, FtlParser};
pub use json::{parse_json, JsonParser};
pub use mard::{parse_mard, MardParser};
pub use sql::{parse_sql, SqlParser};
pub use sqd::{parse_sqd, SqdParser};
pub use stl::{parse_stl, StlParser};

/// Parser for one file format
///
/// Implement this trait to add support for new formats.
pub trait SaphireParser: Send + Sync + 'static {
    /// Format handled by this parser
    fn format(&self) -> LegacyFormat;

    /// Parse file text into a fragment
    fn parse(&self, content: &str) -> Fragment;

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        LegacyFormat::detect(path) == Some(self.format())
    }
}

/// Dispatch table from format to parser
pub struct ParserRegistry {
    parsers: Vec<Box<dyn SaphireParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parser_count", &self.parsers.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser, replacing any earlier one for the same format
    pub fn register<P: SaphireParser>(&mut self, parser: P) {
        let format = parser.format();
        self.parsers.retain(|p| p.format() != format);
        self.parsers.push(Box::new(parser));
    }

    /// Parser for a format
    #[must_use]
    pub fn find(&self, format: LegacyFormat) -> Option<&dyn SaphireParser> {
        self.parsers
            .iter()
            .find(|p| p.format() == format)
            .map(|p| &**p)
    }

    /// Find parser for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn SaphireParser> {
        self.parsers.iter().find(|p| p.can_parse(path)).map(|p| &**p)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.format().extension()).collect()
    }

    /// Parse a file by its path, falling back to an unknown fragment
    #[must_use]
    pub fn parse_file(&self, path: &Path, content: &str) -> Fragment {
        match self.find_for_path(path) {
            Some(parser) => {
                tracing::debug!(
                    "Parsing {} as {}",
                    path.display(),
                    parser.format().extension()
                );
                parser.parse(content)
            }
            None => {
                let label = extension_of(path)
                    .map(|ext| format!(".{ext}"))
                    .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_default();
                Fragment::unknown(&label)
            }
        }
    }
}

/// Create default parser registry with built-in parsers
#[must_use]
pub fn default_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();

    // Model data
    registry.register(BeiParser);
    registry.register(FtlParser);
    registry.register(EtlParser);
    registry.register(EsdParser);

    // Sequences
    registry.register(StlParser);
    registry.register(SqlParser);
    registry.register(SqdParser);

    // Project and references
    registry.register(FadParser);
    registry.register(MardParser);

    registry.register(JsonParser);

    registry
}

static DEFAULT_REGISTRY: Lazy<ParserRegistry> = Lazy::new(default_parsers);

/// Parse a file with the built-in parsers
#[must_use]
pub fn parse_file(path: &Path, content: &str) -> Fragment {
    DEFAULT_REGISTRY.parse_file(path, content)
}

/// Shared registry of built-in parsers
#[must_use]
pub fn builtin() -> &'static ParserRegistry {
    &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentData;

    struct UpperParser;

    impl SaphireParser for UpperParser {
        fn format(&self) -> LegacyFormat {
            LegacyFormat::Mard
        }

        fn parse(&self, content: &str) -> Fragment {
            Fragment::new(FragmentData::Json(serde_json::Value::String(
                content.to_uppercase(),
            )))
        }
    }

    #[test]
    fn parser_can_parse_by_extension() {
        assert!(EtlParser.can_parse(Path::new("trees.ETL")));
        assert!(EtlParser.can_parse(Path::new("/path/to/.etl")));
        assert!(!EtlParser.can_parse(Path::new("trees.ETD")));
        assert!(!EtlParser.can_parse(Path::new("file")));
    }

    #[test]
    fn registry_covers_every_format() {
        let registry = default_parsers();
        for format in LegacyFormat::ALL {
            assert!(registry.find(format).is_some(), "{format:?}");
        }
        assert_eq!(registry.all_extensions().len(), LegacyFormat::ALL.len());
    }

    #[test]
    fn register_replaces_same_format() {
        let mut registry = default_parsers();
        registry.register(UpperParser);

        let fragment = registry.parse_file(Path::new("x.MARD"), "abc");
        assert_eq!(fragment.data, FragmentData::Json(serde_json::json!("ABC")));
        assert_eq!(registry.all_extensions().len(), LegacyFormat::ALL.len());
    }

    #[test]
    fn unknown_files_yield_unknown_fragment() {
        let fragment = parse_file(Path::new("notes.FTD"), "anything");
        assert_eq!(fragment.kind(), "unknown");
        assert!(fragment.errors[0].contains(".FTD"));

        let fragment = parse_file(Path::new("README"), "");
        assert!(fragment.errors[0].contains("README"));
    }

    #[test]
    fn registry_debug() {
        let debug_str = format!("{:?}", builtin());
        assert!(debug_str.contains("ParserRegistry"));
        assert!(debug_str.contains("ETL"));
    }
}
