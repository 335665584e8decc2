//! SAPHIRE Export Extraction
//!
//! Unpacks an exported SAPHIRE project, walks it, parses every model file
//! and aggregates the results into a single
//! [`UnifiedDocument`](saphire_model::UnifiedDocument) plus per-file
//! records.
//!
//! # Example
//!
//! ```rust,no_run
//! use saphire_extract::{ExtractConfig, Extractor};
//! use std::path::Path;
//!
//! let extractor = Extractor::new(ExtractConfig::default());
//! let report = extractor.extract(Path::new("export.zip"), "job-42")?;
//! println!("{} event trees", report.summary().event_trees);
//! # Ok::<(), saphire_extract::ExtractError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod archive;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;
pub mod store;
pub mod walker;

// Re-exports for convenience
pub use archive::{extract_archive, extract_archive_with, ExtractedArchive};
pub use config::{ExtractConfig, DEFAULT_MAX_FILE_SIZE};
pub use error::{ConfigError, ExtractError, StoreError};
pub use extractor::Extractor;
pub use report::{ExtractionMetadata, ExtractionReport, FileRecord};
pub use store::{DocumentStore, MemoryStore};
pub use walker::{relative_path, walk_export, ExportFile, Walk};

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::ExtractConfig;
    pub use crate::error::ExtractError;
    pub use crate::extractor::Extractor;
    pub use crate::report::ExtractionReport;
    pub use crate::store::{DocumentStore, MemoryStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
