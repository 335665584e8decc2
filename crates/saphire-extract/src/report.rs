//! Extraction results

use indexmap::IndexMap;
use saphire_model::{DocumentSummary, UnifiedDocument};
use saphire_parsers::FileCategory;
use serde::{Deserialize, Serialize};

/// What happened to one export file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Classifier verdict
    pub category: FileCategory,
    /// Size in bytes
    pub size: u64,
    /// BLAKE3 hex digest of the raw bytes; absent when the file was not read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Fragment kind produced by the parser, if one ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    /// Per-line parser errors and skip reasons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<String>,
}

impl FileRecord {
    /// Record for a file that has not been read yet
    #[must_use]
    pub fn new(category: FileCategory, size: u64) -> Self {
        Self {
            category,
            size,
            checksum: None,
            fragment: None,
            parse_errors: Vec::new(),
        }
    }

    /// Whether a parser ran on this file
    #[must_use]
    pub fn was_parsed(&self) -> bool {
        self.fragment.is_some()
    }
}

/// Counters over a whole extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Files visited, skipped names excluded
    pub total_files: usize,
    /// I/O failures
    pub errors: usize,
    /// Decode failures, oversized files and dropped event trees
    pub warnings: usize,
    /// Per-line parser errors summed over all files
    pub line_errors: usize,
}

/// Outcome of one extraction job
///
/// Serializes as `{ job_id, files, metadata, saphire_data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Job the report belongs to
    pub job_id: String,
    /// Keyed by `/`-separated path relative to the export root
    pub files: IndexMap<String, FileRecord>,
    /// Run counters
    pub metadata: ExtractionMetadata,
    /// Aggregated model
    #[serde(rename = "saphire_data")]
    pub document: UnifiedDocument,
}

impl ExtractionReport {
    /// Empty report for `job_id`
    #[must_use]
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            files: IndexMap::new(),
            metadata: ExtractionMetadata::default(),
            document: UnifiedDocument::new(),
        }
    }

    /// Collection sizes of the aggregated document
    #[must_use]
    pub fn summary(&self) -> DocumentSummary {
        self.document.summary()
    }

    /// No errors, warnings or line errors
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.metadata.errors == 0 && self.metadata.warnings == 0 && self.metadata.line_errors == 0
    }

    /// Records of files in `category`
    pub fn files_in(&self, category: FileCategory) -> impl Iterator<Item = (&String, &FileRecord)> {
        self.files.iter().filter(move |(_, r)| r.category == category)
    }
}
