//! Typed OpenPRA document
//!
//! Mirrors the JSON layout of the latest schema. Older documents
//! deserialize too: every collection defaults to empty and `lmp` is
//! optional.

use crate::error::SchemaError;
use crate::validate::validate_document;
use crate::version::SchemaVersion;
use saphire_model::{GateType, ReferenceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form `key -> value` attributes
pub type Attributes = Map<String, Value>;

/// Document header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Human-readable title
    #[serde(default)]
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// RFC 3339 creation timestamp
    #[serde(default)]
    pub created_date: String,
    /// Tool or import the content came from
    #[serde(default)]
    pub source: String,
    /// Version the document was written for
    pub schema_version: SchemaVersion,
    /// Free-form attributes
    #[serde(default)]
    pub attributes: Attributes,
    /// Extraction job the content came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Number of files seen by that job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
}

impl Metadata {
    /// Empty header stamped with the current time
    #[must_use]
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            created_date: chrono::Utc::now().to_rfc3339(),
            source: String::new(),
            schema_version: version,
            attributes: Attributes::new(),
            job_id: None,
            file_count: None,
        }
    }
}

/// `{ "id": ... }` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    /// Referenced id
    pub id: String,
}

impl IdRef {
    /// Reference to `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Typed gate input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateInput {
    /// Referenced gate or basic event
    pub id: String,
    /// What the id refers to
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
}

/// Gate with a normalized type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateModel {
    /// Gate id
    pub id: String,
    /// Normalized gate kind
    #[serde(rename = "type")]
    pub gate_type: GateType,
    /// Typed inputs
    #[serde(default)]
    pub inputs: Vec<GateInput>,
}

/// Fault tree with typed gates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultTreeModel {
    /// Tree id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Gates in source order
    #[serde(default)]
    pub gates: Vec<GateModel>,
    /// Basic events used by the tree
    #[serde(default)]
    pub basic_events: Vec<IdRef>,
    /// Free-form attributes, omitted when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Attributes,
}

/// One branch decision along a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Branching event
    pub event: String,
    /// Whether the success branch was taken
    pub success: bool,
}

/// Sequence inside an event tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSequence {
    /// Sequence id
    pub id: String,
    /// End state reached
    #[serde(default)]
    pub end_state: String,
    /// Branch decisions in order
    #[serde(default)]
    pub path: Vec<PathStep>,
}

/// Event tree with normalized sequence paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTreeModel {
    /// Tree id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Initiating event id, empty when unknown
    #[serde(default)]
    pub initiating_event: String,
    /// Sequences in source order
    #[serde(default)]
    pub sequences: Vec<TreeSequence>,
    /// Free-form attributes, omitted when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Attributes,
}

/// Basic event with its failure probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicEventModel {
    /// Event id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Failure probability
    #[serde(default)]
    pub probability: f64,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Free-form attributes, omitted when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Attributes,
}

/// Initiating event derived from the event trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatingEventModel {
    /// Event id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Free-form attributes, omitted when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Attributes,
}

/// Accident end state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndStateModel {
    /// End-state id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Free-form attributes, omitted when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Attributes,
}

/// Top-level accident sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceModel {
    /// Sequence id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// End state reached
    #[serde(default)]
    pub end_state: String,
    /// Free-form attributes, omitted when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Attributes,
}

/// Model collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Models {
    /// Fault trees
    #[serde(default)]
    pub fault_trees: Vec<FaultTreeModel>,
    /// Event trees
    #[serde(default)]
    pub event_trees: Vec<EventTreeModel>,
    /// Basic events
    #[serde(default)]
    pub basic_events: Vec<BasicEventModel>,
    /// Initiating events
    #[serde(default)]
    pub initiating_events: Vec<InitiatingEventModel>,
    /// End states
    #[serde(default)]
    pub end_states: Vec<EndStateModel>,
    /// Top-level sequences
    #[serde(default)]
    pub sequences: Vec<SequenceModel>,
}

/// Analysis results; opaque to this crate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Quantification results
    #[serde(default)]
    pub quantifications: Vec<Value>,
    /// Importance measures
    #[serde(default)]
    pub importance_measures: Vec<Value>,
    /// Uncertainty analysis settings
    #[serde(default)]
    pub uncertainty: Attributes,
}

/// Licensing Modernization Project section (2.x only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lmp {
    /// Licensing basis events
    #[serde(default)]
    pub lbes: Vec<Value>,
    /// Structures, systems and components
    #[serde(default)]
    pub sscs: Vec<Value>,
    /// Design-basis risk metrics
    #[serde(default)]
    pub drm: Attributes,
}

/// Complete OpenPRA document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPraDocument {
    /// Schema version of the document
    pub version: SchemaVersion,
    /// Header
    pub metadata: Metadata,
    /// Model collections
    pub models: Models,
    /// Analysis section
    #[serde(default)]
    pub analysis: Analysis,
    /// LMP section, present from 2.0.0 on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lmp: Option<Lmp>,
}

impl OpenPraDocument {
    /// Empty document at the latest version
    #[must_use]
    pub fn new() -> Self {
        Self::with_version(SchemaVersion::latest())
    }

    /// Empty document at `version`; the LMP section exists from 2.0.0 on
    #[must_use]
    pub fn with_version(version: SchemaVersion) -> Self {
        Self {
            version,
            metadata: Metadata::new(version),
            models: Models::default(),
            analysis: Analysis::default(),
            lmp: (version.major() >= 2).then(Lmp::default),
        }
    }

    /// Serialize to a JSON value
    ///
    /// # Errors
    /// A map key or value that cannot be represented as JSON.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Deserialize from a JSON value
    ///
    /// # Errors
    /// `value` does not have the document shape.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Validate against the rules of `self.version`
    ///
    /// # Errors
    /// The first rule the document breaks.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let value = self
            .to_value()
            .map_err(|e| SchemaError::Serialization(e.to_string()))?;
        validate_document(&value)
    }
}

impl Default for OpenPraDocument {
    fn default() -> Self {
        Self::new()
    }
}
