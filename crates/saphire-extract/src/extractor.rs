//! Extraction orchestrator
//!
//! Walks an unpacked export, classifies every file, runs the matching
//! parser on model files and folds the fragments into one
//! [`UnifiedDocument`](saphire_model::UnifiedDocument).

use crate::archive::extract_archive_with;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::report::{ExtractionMetadata, ExtractionReport, FileRecord};
use crate::walker::{walk_export, ExportFile};
use indexmap::IndexMap;
use saphire_model::{DocumentBuilder, Insertion};
use saphire_parsers::{classify, default_parsers, Fragment, FragmentData, ParserRegistry};
use std::path::Path;

/// Turns SAPHIRE exports into extraction reports
#[derive(Debug)]
pub struct Extractor {
    config: ExtractConfig,
    registry: ParserRegistry,
}

/// Mutable state of one run
struct Run {
    builder: DocumentBuilder,
    files: IndexMap<String, FileRecord>,
    metadata: ExtractionMetadata,
}

impl Run {
    fn new() -> Self {
        Self {
            builder: DocumentBuilder::new(),
            files: IndexMap::new(),
            metadata: ExtractionMetadata::default(),
        }
    }

    fn fold(&mut self, fragment: Fragment) {
        match fragment.data {
            FragmentData::BasicEventInfo { basic_events } => {
                for row in basic_events {
                    self.builder.add_basic_event(row.into_basic_event());
                }
            }
            FragmentData::FaultTreeLogic { fault_trees } => {
                for tree in fault_trees.into_values() {
                    self.builder.add_fault_tree(tree);
                }
            }
            FragmentData::EventTreeLogic { event_trees } => {
                for tree in event_trees.into_values() {
                    if let Insertion::Rejected(_) = self.builder.add_event_tree(tree) {
                        self.metadata.warnings += 1;
                    }
                }
            }
            FragmentData::ProjectDescription(project) => self.builder.merge_project(project),
            FragmentData::EndStateDescription { end_states } => {
                for end_state in end_states {
                    self.builder.add_end_state(end_state);
                }
            }
            FragmentData::SequenceList { sequences } => {
                for row in sequences {
                    self.builder.add_sequence(row.into_sequence());
                }
            }
            FragmentData::MardFile { .. } | FragmentData::Json(_) | FragmentData::Unknown => {}
        }
    }

    fn finish(self, job_id: &str) -> ExtractionReport {
        ExtractionReport {
            job_id: job_id.to_string(),
            files: self.files,
            metadata: self.metadata,
            document: self.builder.finish(),
        }
    }
}

impl Extractor {
    /// Extractor with the built-in parsers
    #[must_use]
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            registry: default_parsers(),
        }
    }

    /// Replace the parser registry
    #[must_use]
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Get configuration
    #[must_use]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Unpack `zip_path` into a temporary directory and analyze it
    ///
    /// The temporary directory is removed before this returns.
    ///
    /// # Errors
    /// Archive failures; see also [`Extractor::analyze`].
    pub fn extract(&self, zip_path: &Path, job_id: &str) -> Result<ExtractionReport, ExtractError> {
        let archive = extract_archive_with(&self.config, zip_path, None)?;
        self.analyze(archive.path(), job_id)
    }

    /// Analyze an already unpacked export rooted at `root`
    ///
    /// Per-file problems never abort the run; they are counted in
    /// [`ExtractionMetadata`].
    ///
    /// # Errors
    /// `root` is not a directory.
    pub fn analyze(&self, root: &Path, job_id: &str) -> Result<ExtractionReport, ExtractError> {
        if !root.is_dir() {
            return Err(ExtractError::NotADirectory(root.to_path_buf()));
        }

        let walk = walk_export(root, &self.config);
        let mut run = Run::new();
        run.metadata.errors += walk.errors.len();

        for file in &walk.files {
            self.visit(file, &mut run);
        }

        let report = run.finish(job_id);
        let summary = report.summary();
        tracing::info!(
            "Extraction {} complete: {} files, {} fault trees, {} event trees, {} basic events, {} errors, {} warnings",
            job_id,
            report.metadata.total_files,
            summary.fault_trees,
            summary.event_trees,
            summary.basic_events,
            report.metadata.errors,
            report.metadata.warnings
        );
        Ok(report)
    }

    fn visit(&self, file: &ExportFile, run: &mut Run) {
        run.metadata.total_files += 1;
        let category = classify(&file.path);
        let mut record = FileRecord::new(category, file.size);
        tracing::debug!("Classified {} as {}", file.relative, category);

        if file.size > self.config.max_file_size {
            tracing::warn!(
                "Skipping {}: {} bytes exceeds limit of {}",
                file.relative,
                file.size,
                self.config.max_file_size
            );
            run.metadata.warnings += 1;
            record
                .parse_errors
                .push(format!("file exceeds {} bytes, not parsed", self.config.max_file_size));
            run.files.insert(file.relative.clone(), record);
            return;
        }

        let bytes = match std::fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Error reading {}: {}", file.relative, e);
                run.metadata.errors += 1;
                return;
            }
        };
        record.checksum = Some(blake3::hash(&bytes).to_hex().to_string());

        let parser = category
            .is_model()
            .then(|| self.registry.find_for_path(&file.path))
            .flatten();

        if let Some(parser) = parser {
            match self.decode(&file.relative, bytes, run) {
                Some(text) => {
                    let fragment = parser.parse(&text);
                    tracing::debug!(
                        "Parsed {} as {} with {} errors",
                        file.relative,
                        fragment.kind(),
                        fragment.errors.len()
                    );
                    run.metadata.line_errors += fragment.errors.len();
                    record.fragment = Some(fragment.kind().to_string());
                    record.parse_errors.clone_from(&fragment.errors);
                    run.fold(fragment);
                }
                None => record
                    .parse_errors
                    .push("invalid UTF-8, not parsed".to_string()),
            }
        }

        run.files.insert(file.relative.clone(), record);
    }

    fn decode(&self, relative: &str, bytes: Vec<u8>, run: &mut Run) -> Option<String> {
        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Could not decode {} as UTF-8: {}", relative, e);
                run.metadata.warnings += 1;
                self.config
                    .lossy_decoding
                    .then(|| String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}
