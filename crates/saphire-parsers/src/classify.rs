//! Extension-based file classification
//!
//! Classification never fails: unknown extensions fall back to a generic
//! text, JSON or binary category, defaulting to text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Coarse category of an archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    /// Fault-tree logic and companions
    FaultTree,
    /// Event-tree logic and companions
    EventTree,
    /// Basic-event information and companions
    BasicEvent,
    /// End-state lists and descriptions
    EndState,
    /// Sequence lists, logic and descriptions
    Sequence,
    /// Project description and header files
    Project,
    /// Master relational database references
    MasterDb,
    /// Known SAPHIRE extension without a model category
    Saphire,
    /// Plain text
    Text,
    /// JSON document
    Json,
    /// Binary blob
    Binary,
}

impl FileCategory {
    /// Serialized label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FileCategory::FaultTree => "fault_tree",
            FileCategory::EventTree => "event_tree",
            FileCategory::BasicEvent => "basic_event",
            FileCategory::EndState => "end_state",
            FileCategory::Sequence => "sequence",
            FileCategory::Project => "project",
            FileCategory::MasterDb => "master_db",
            FileCategory::Saphire => "saphire",
            FileCategory::Text => "text",
            FileCategory::Json => "json",
            FileCategory::Binary => "binary",
        }
    }

    /// Whether files of this category contribute to the unified document
    #[must_use]
    pub const fn is_model(self) -> bool {
        matches!(
            self,
            FileCategory::FaultTree
                | FileCategory::EventTree
                | FileCategory::BasicEvent
                | FileCategory::EndState
                | FileCategory::Sequence
                | FileCategory::Project
                | FileCategory::MasterDb
        )
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats that have a dedicated parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegacyFormat {
    /// Basic Event Information
    Bei,
    /// Fault Tree Logic
    Ftl,
    /// Event Tree Logic
    Etl,
    /// Project Description
    Fad,
    /// Master Relational Database
    Mard,
    /// End State Description
    Esd,
    /// Sequence List
    Stl,
    /// Sequence Logic
    Sql,
    /// Sequence Description
    Sqd,
    /// JSON passthrough
    Json,
}

impl LegacyFormat {
    /// Every format, in registry order
    pub const ALL: [LegacyFormat; 10] = [
        LegacyFormat::Bei,
        LegacyFormat::Ftl,
        LegacyFormat::Etl,
        LegacyFormat::Fad,
        LegacyFormat::Mard,
        LegacyFormat::Esd,
        LegacyFormat::Stl,
        LegacyFormat::Sql,
        LegacyFormat::Sqd,
        LegacyFormat::Json,
    ];

    /// Upper-case extension without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            LegacyFormat::Bei => "BEI",
            LegacyFormat::Ftl => "FTL",
            LegacyFormat::Etl => "ETL",
            LegacyFormat::Fad => "FAD",
            LegacyFormat::Mard => "MARD",
            LegacyFormat::Esd => "ESD",
            LegacyFormat::Stl => "STL",
            LegacyFormat::Sql => "SQL",
            LegacyFormat::Sqd => "SQD",
            LegacyFormat::Json => "JSON",
        }
    }

    /// Format for an upper-case extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        LegacyFormat::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Format of a path, if it has a dedicated parser
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        extension_of(path).and_then(|ext| Self::from_extension(&ext))
    }
}

/// Known SAPHIRE extensions: (extension, category, description)
const SAPHIRE_EXTENSIONS: &[(&str, FileCategory, &str)] = &[
    ("FTL", FileCategory::FaultTree, "Fault Tree Logic"),
    ("FTD", FileCategory::FaultTree, "Fault Tree Description"),
    ("FTA", FileCategory::FaultTree, "Fault Tree Attribute"),
    ("FTC", FileCategory::FaultTree, "Fault Tree Components"),
    ("FTT", FileCategory::FaultTree, "Fault Tree Types"),
    ("FTY", FileCategory::FaultTree, "Fault Tree System"),
    ("ETL", FileCategory::EventTree, "Event Tree Logic"),
    ("ETD", FileCategory::EventTree, "Event Tree Description"),
    ("ETA", FileCategory::EventTree, "Event Tree Attribute"),
    ("BEI", FileCategory::BasicEvent, "Basic Event Information"),
    ("BEC", FileCategory::BasicEvent, "Basic Event Category"),
    ("BED", FileCategory::BasicEvent, "Basic Event Description"),
    ("BEA", FileCategory::BasicEvent, "Basic Event Attribute"),
    ("BET", FileCategory::BasicEvent, "Basic Event Type"),
    ("BEF", FileCategory::BasicEvent, "Basic Event Failure"),
    ("BEG", FileCategory::BasicEvent, "Basic Event Group"),
    ("BEH", FileCategory::BasicEvent, "Basic Event Hazard"),
    ("ESL", FileCategory::EndState, "End State List"),
    ("ESD", FileCategory::EndState, "End State Description"),
    ("ESA", FileCategory::EndState, "End State Attribute"),
    ("ESC", FileCategory::EndState, "End State Cut Set"),
    ("ESI", FileCategory::EndState, "End State Information"),
    ("STL", FileCategory::Sequence, "Sequence List"),
    ("STD", FileCategory::Sequence, "Sequence Description"),
    ("STA", FileCategory::Sequence, "Sequence Attribute"),
    ("SQL", FileCategory::Sequence, "Sequence Logic"),
    ("SQD", FileCategory::Sequence, "Sequence Description"),
    ("SQC", FileCategory::Sequence, "Sequence Cut Set"),
    ("SQP", FileCategory::Sequence, "Sequence Probability"),
    ("SQY", FileCategory::Sequence, "Sequence Uncertainty"),
    ("SQA", FileCategory::Sequence, "Sequence Attribute"),
    ("FAD", FileCategory::Project, "Project Description"),
    ("PRF", FileCategory::Project, "Project File"),
    ("PRF2", FileCategory::Project, "Project File"),
    ("PHD", FileCategory::Project, "Project Header Description"),
    ("HID", FileCategory::Project, "Header ID"),
    ("MTD", FileCategory::Project, "Model Type Description"),
    ("FAA", FileCategory::Project, "Family Attribute Additional"),
    ("FAT", FileCategory::Project, "Family Attribute Type"),
    ("FAU", FileCategory::Project, "Family Attribute Uncertainty"),
    ("MARD", FileCategory::MasterDb, "Master Relational Database"),
    ("EGI", FileCategory::MasterDb, "Event Group Information"),
    ("EGD", FileCategory::MasterDb, "Event Group Description"),
    ("GDL", FileCategory::Saphire, "Graphical Description"),
    ("IDX", FileCategory::Saphire, "Index"),
];

/// Upper-cased extension of a path, without the dot
///
/// A dot-prefixed name with no further extension (`.FTL`) uses the
/// name itself.
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return Some(ext.to_uppercase());
    }
    let name = path.file_name()?.to_str()?;
    name.strip_prefix('.')
        .filter(|rest| !rest.is_empty() && !rest.contains('.'))
        .map(str::to_uppercase)
}

/// Human description of a known SAPHIRE extension
#[must_use]
pub fn describe(ext: &str) -> Option<&'static str> {
    lookup(ext).map(|(_, _, description)| *description)
}

fn lookup(ext: &str) -> Option<&'static (&'static str, FileCategory, &'static str)> {
    SAPHIRE_EXTENSIONS.iter().find(|(known, _, _)| *known == ext)
}

/// Classify a path by extension
#[must_use]
pub fn classify(path: &Path) -> FileCategory {
    let Some(ext) = extension_of(path) else {
        tracing::debug!("No extension, defaulting to text: {}", path.display());
        return FileCategory::Text;
    };

    if let Some((_, category, description)) = lookup(&ext) {
        tracing::debug!("Identified {} as {} ({})", path.display(), category, description);
        return *category;
    }

    match ext.to_lowercase().as_str() {
        "txt" | "md" | "csv" | "log" => FileCategory::Text,
        "json" => FileCategory::Json,
        "zip" | "gz" | "tar" | "bin" | "exe" => FileCategory::Binary,
        _ => {
            tracing::debug!("Unrecognized extension, defaulting to text: {}", path.display());
            FileCategory::Text
        }
    }
}

/// Every known SAPHIRE extension
#[must_use]
pub fn known_extensions() -> Vec<&'static str> {
    SAPHIRE_EXTENSIONS.iter().map(|(ext, _, _)| *ext).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_extensions_map_to_categories() {
        let cases = [
            ("model.FTL", FileCategory::FaultTree),
            ("model.ftl", FileCategory::FaultTree),
            ("x/y/TREES.ETL", FileCategory::EventTree),
            ("events.BEI", FileCategory::BasicEvent),
            ("states.ESD", FileCategory::EndState),
            ("seq.SQD", FileCategory::Sequence),
            ("project.PRF2", FileCategory::Project),
            ("db.MARD", FileCategory::MasterDb),
            ("layout.GDL", FileCategory::Saphire),
        ];
        for (path, expected) in cases {
            assert_eq!(classify(Path::new(path)), expected, "{path}");
        }
    }

    #[test]
    fn dot_prefixed_names_use_the_name() {
        assert_eq!(extension_of(Path::new("_Subs/.ETL")).as_deref(), Some("ETL"));
        assert_eq!(classify(Path::new("_Subs/.ETL")), FileCategory::EventTree);
        assert_eq!(classify(Path::new(".FTL")), FileCategory::FaultTree);
        assert_eq!(LegacyFormat::detect(Path::new("dir/.bei")), Some(LegacyFormat::Bei));
    }

    #[test]
    fn fallback_categories() {
        assert_eq!(classify(Path::new("readme.md")), FileCategory::Text);
        assert_eq!(classify(Path::new("data.json")), FileCategory::Json);
        assert_eq!(classify(Path::new("nested.zip")), FileCategory::Binary);
        assert_eq!(classify(Path::new("weird.xyz")), FileCategory::Text);
        assert_eq!(classify(Path::new("noext")), FileCategory::Text);
    }

    #[test]
    fn formats_round_trip_extensions() {
        for format in LegacyFormat::ALL {
            assert_eq!(LegacyFormat::from_extension(format.extension()), Some(format));
        }
        assert_eq!(LegacyFormat::from_extension("FTD"), None);
    }

    #[test]
    fn descriptions() {
        assert_eq!(describe("ETL"), Some("Event Tree Logic"));
        assert_eq!(describe("TXT"), None);
        assert!(known_extensions().contains(&"SQA"));
    }

    #[test]
    fn model_categories() {
        assert!(FileCategory::MasterDb.is_model());
        assert!(!FileCategory::Saphire.is_model());
        assert!(!FileCategory::Json.is_model());
    }
}
