//! Lenient source model
//!
//! Typed extraction output and raw JSON both pass through these shapes
//! before conversion. Absent fields stay `None` so the converter can
//! apply its own defaults. Raw JSON is read item by item: an entry that
//! does not fit its shape is left out and reported as a [`SkippedItem`].

use crate::error::ConvertError;
use saphire_extract::ExtractionReport;
use saphire_model::{ReferenceKind, UnifiedDocument, UNKNOWN_ID};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Gate input or basic-event reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    /// Bare id; the kind is guessed from the id
    Id(String),
    /// Id with an optional declared kind
    Typed {
        /// Referenced id
        id: String,
        /// Declared kind, `gate` or `basic_event`
        #[serde(default, rename = "type", alias = "kind")]
        kind: Option<String>,
    },
}

impl SourceRef {
    /// Referenced id
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            SourceRef::Id(id) | SourceRef::Typed { id, .. } => id,
        }
    }

    /// Declared kind, else the gate-prefix heuristic
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self {
            SourceRef::Typed {
                kind: Some(kind), ..
            } if kind == ReferenceKind::Gate.as_str() => ReferenceKind::Gate,
            SourceRef::Typed {
                kind: Some(kind), ..
            } if kind == ReferenceKind::BasicEvent.as_str() => ReferenceKind::BasicEvent,
            other => ReferenceKind::from_prefix(other.id()),
        }
    }
}

/// Element of a sequence path
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SourceStep {
    /// `{ "event": ..., "state": ... }`
    Branch {
        /// Branching event
        event: String,
        /// Branch taken; see [`state_success`](crate::normalize::state_success)
        state: Value,
    },
    /// Bare token such as `"S"` or `"F"`
    Token(String),
    /// Anything else; ignored
    Other(Value),
}

/// Project header of a source model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceProject {
    /// Project name
    pub name: Option<String>,
    /// Project description
    pub description: Option<String>,
    /// Free-form attributes, copied into the document metadata
    pub attributes: Map<String, Value>,
}

impl SourceProject {
    /// No name, no description, no attributes
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.as_deref().unwrap_or_default().is_empty()
            && self.description.as_deref().unwrap_or_default().is_empty()
            && self.attributes.is_empty()
    }
}

/// Gate of a source fault tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceGate {
    /// Gate id
    pub id: Option<String>,
    /// Raw gate token, normalized on conversion
    #[serde(rename = "type")]
    pub gate_type: Option<String>,
    /// Gate inputs
    pub inputs: Vec<SourceRef>,
}

/// Source fault tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceFaultTree {
    /// Tree id
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Gates in file order
    pub gates: Vec<SourceGate>,
    /// Basic events referenced by the tree
    pub basic_events: Vec<SourceRef>,
    /// Free-form attributes
    pub attributes: Option<Map<String, Value>>,
}

/// Sequence inside a source event tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceSequence {
    /// Sequence id
    pub id: Option<String>,
    /// End state reached
    pub end_state: Option<String>,
    /// Branch path
    pub path: Vec<SourceStep>,
}

/// Source event tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceEventTree {
    /// Tree id
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Initiating event id
    pub initiating_event: Option<String>,
    /// Sequences in file order
    pub sequences: Vec<SourceSequence>,
    /// Free-form attributes
    pub attributes: Option<Map<String, Value>>,
}

/// Source basic event
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceBasicEvent {
    /// Event id
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Failure probability
    pub probability: Option<f64>,
    /// Description
    pub description: Option<String>,
    /// Free-form attributes
    pub attributes: Option<Map<String, Value>>,
}

/// Source end state
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceEndState {
    /// End-state id
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Free-form attributes
    pub attributes: Option<Map<String, Value>>,
}

/// Top-level sequence entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceSequenceEntry {
    /// Sequence id
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// End state reached
    pub end_state: Option<String>,
    /// Free-form attributes
    pub attributes: Option<Map<String, Value>>,
}

/// Whole SAPHIRE model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceModel {
    /// Project header, if any
    pub project: Option<SourceProject>,
    /// Fault trees
    pub fault_trees: Vec<SourceFaultTree>,
    /// Event trees
    pub event_trees: Vec<SourceEventTree>,
    /// Basic events
    pub basic_events: Vec<SourceBasicEvent>,
    /// End states
    pub end_states: Vec<SourceEndState>,
    /// Top-level sequences
    pub sequences: Vec<SourceSequenceEntry>,
}

/// One entry of the per-file legacy layout
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyEntry {
    /// `type: fault_tree`
    FaultTree(SourceFaultTree),
    /// `type: event_tree`
    EventTree(SourceEventTree),
    /// `type: basic_event`
    BasicEvent(SourceBasicEvent),
}

/// Everything the converter accepts
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionInput {
    /// Model produced by an extraction job
    Job {
        /// Extraction job id
        job_id: String,
        /// Files seen by the job
        file_count: usize,
        /// Aggregated model
        model: SourceModel,
    },
    /// Bare model
    Direct(SourceModel),
    /// `files.<path>.saphire.{type, data}` entries
    Legacy(Vec<LegacyEntry>),
}

/// Input entry left out because it does not fit its shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Where the entry sits, e.g. `basic_events[1]` or a legacy file path
    pub location: String,
    /// Why it was rejected
    pub reason: String,
}

/// Interpreted raw input
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    /// Everything that could be read
    pub input: ConversionInput,
    /// Entries that could not, in input order
    pub skipped: Vec<SkippedItem>,
}

fn join(base: Option<&str>, key: &str) -> String {
    match base {
        Some(base) => format!("{base}.{key}"),
        None => key.to_string(),
    }
}

/// Item-by-item reader that records what it has to drop
#[derive(Default)]
struct Lenient {
    skipped: Vec<SkippedItem>,
}

impl Lenient {
    fn skip(&mut self, location: String, reason: String) {
        tracing::warn!("Skipping {}: {}", location, reason);
        self.skipped.push(SkippedItem { location, reason });
    }

    fn item<T: DeserializeOwned>(&mut self, value: &Value, location: String) -> Option<T> {
        match T::deserialize(value) {
            Ok(item) => Some(item),
            Err(e) => {
                self.skip(location, e.to_string());
                None
            }
        }
    }

    fn list<T: DeserializeOwned>(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        base: Option<&str>,
    ) -> Vec<T> {
        match object.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| self.item(item, format!("{}[{i}]", join(base, key))))
                .collect(),
            Some(_) => {
                self.skip(join(base, key), "expected a list".to_string());
                Vec::new()
            }
        }
    }

    fn model(&mut self, value: &Value, base: Option<&str>) -> SourceModel {
        let object = match value {
            Value::Null => return SourceModel::default(),
            Value::Object(object) => object,
            _ => {
                self.skip(
                    base.unwrap_or("model").to_string(),
                    "expected an object".to_string(),
                );
                return SourceModel::default();
            }
        };

        let project = match object.get("project") {
            None | Some(Value::Null) => None,
            Some(project) => self.item(project, join(base, "project")),
        };

        SourceModel {
            project,
            fault_trees: self.list(object, "fault_trees", base),
            event_trees: self.list(object, "event_trees", base),
            basic_events: self.list(object, "basic_events", base),
            end_states: self.list(object, "end_states", base),
            sequences: self.list(object, "sequences", base),
        }
    }

    fn legacy(&mut self, object: &Map<String, Value>) -> Vec<LegacyEntry> {
        let files = match object.get("files") {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Object(files)) => files,
            Some(_) => {
                self.skip("files".to_string(), "expected an object".to_string());
                return Vec::new();
            }
        };

        let empty = Value::Object(Map::new());
        let mut entries = Vec::new();
        for (path, info) in files {
            let Some(saphire) = info.get("saphire") else {
                continue;
            };
            let data = saphire.get("data").unwrap_or(&empty);
            let entry = match saphire.get("type").and_then(Value::as_str) {
                Some("fault_tree") => self.item(data, path.clone()).map(LegacyEntry::FaultTree),
                Some("event_tree") => self.item(data, path.clone()).map(LegacyEntry::EventTree),
                Some("basic_event") => self.item(data, path.clone()).map(LegacyEntry::BasicEvent),
                _ => continue,
            };
            entries.extend(entry);
        }
        entries
    }
}

impl ConversionInput {
    /// Interpret raw JSON, keeping track of dropped entries
    ///
    /// An object with `saphire_data` is a job, one with `project`,
    /// `fault_trees` and `event_trees` is a bare model, anything else is
    /// read as the legacy per-file layout. Entries that do not fit their
    /// shape are left out and listed in [`ParsedInput::skipped`].
    ///
    /// # Errors
    /// Input is not a JSON object.
    pub fn parse(value: &Value) -> Result<ParsedInput, ConvertError> {
        let object = value.as_object().ok_or(ConvertError::NotAnObject)?;
        let mut reader = Lenient::default();

        let input = if let Some(data) = object.get("saphire_data") {
            let job_id = object
                .get("job_id")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ID)
                .to_string();
            let file_count = object
                .get("metadata")
                .and_then(|m| m.get("total_files"))
                .and_then(Value::as_u64)
                .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));
            Self::Job {
                job_id,
                file_count,
                model: reader.model(data, Some("saphire_data")),
            }
        } else if ["project", "fault_trees", "event_trees"]
            .iter()
            .all(|key| object.contains_key(*key))
        {
            Self::Direct(reader.model(value, None))
        } else {
            tracing::warn!("Using legacy file-by-file conversion - less accurate results may occur");
            Self::Legacy(reader.legacy(object))
        };

        Ok(ParsedInput {
            input,
            skipped: reader.skipped,
        })
    }

    /// Interpret raw JSON, dropping entries that do not fit
    ///
    /// # Errors
    /// Input is not a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        Ok(Self::parse(value)?.input)
    }

    /// Job input from a typed document
    pub fn job(job_id: impl Into<String>, file_count: usize, document: &UnifiedDocument) -> Self {
        Self::Job {
            job_id: job_id.into(),
            file_count,
            model: SourceModel::from(document),
        }
    }
}

impl From<&UnifiedDocument> for ConversionInput {
    fn from(document: &UnifiedDocument) -> Self {
        Self::Direct(SourceModel::from(document))
    }
}

impl From<&ExtractionReport> for ConversionInput {
    fn from(report: &ExtractionReport) -> Self {
        Self::job(
            report.job_id.clone(),
            report.metadata.total_files,
            &report.document,
        )
    }
}

impl From<&UnifiedDocument> for SourceModel {
    fn from(document: &UnifiedDocument) -> Self {
        let project = &document.project;
        let project = (!project.is_empty()).then(|| SourceProject {
            name: non_empty(&project.name),
            description: non_empty(&project.description),
            attributes: project
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        });

        let fault_trees = document
            .fault_trees
            .iter()
            .map(|tree| SourceFaultTree {
                id: Some(tree.id.clone()),
                name: Some(tree.name.clone()),
                description: Some(tree.description.clone()),
                gates: tree
                    .gates
                    .iter()
                    .map(|gate| SourceGate {
                        id: Some(gate.id.clone()),
                        gate_type: Some(gate.gate_type.clone()),
                        inputs: gate
                            .inputs
                            .iter()
                            .map(|input| SourceRef::Typed {
                                id: input.id.clone(),
                                kind: Some(input.kind.as_str().to_string()),
                            })
                            .collect(),
                    })
                    .collect(),
                basic_events: tree.basic_events.iter().cloned().map(SourceRef::Id).collect(),
                attributes: None,
            })
            .collect();

        let event_trees = document
            .event_trees
            .iter()
            .map(|tree| SourceEventTree {
                id: Some(tree.id.clone()),
                name: Some(tree.name.clone()),
                description: None,
                initiating_event: Some(tree.initiating_event.clone()),
                sequences: tree
                    .sequences
                    .iter()
                    .map(|seq| SourceSequence {
                        id: Some(seq.id.clone()),
                        end_state: Some(seq.end_state.clone()),
                        path: seq.path.iter().cloned().map(SourceStep::Token).collect(),
                    })
                    .collect(),
                attributes: None,
            })
            .collect();

        let basic_events = document
            .basic_events
            .iter()
            .map(|event| SourceBasicEvent {
                id: Some(event.id.clone()),
                name: Some(event.name.clone()),
                probability: Some(event.probability),
                description: Some(event.description.clone()),
                attributes: None,
            })
            .collect();

        let end_states = document
            .end_states
            .iter()
            .map(|end_state| SourceEndState {
                id: Some(end_state.id.clone()),
                name: Some(end_state.name.clone()),
                description: Some(end_state.description.clone()),
                attributes: None,
            })
            .collect();

        let sequences = document
            .sequences
            .iter()
            .map(|seq| SourceSequenceEntry {
                id: Some(seq.id.clone()),
                name: Some(seq.name.clone()),
                description: Some(seq.description.clone()),
                end_state: Some(seq.end_state.clone()),
                attributes: None,
            })
            .collect();

        Self {
            project,
            fault_trees,
            event_trees,
            basic_events,
            end_states,
            sequences,
        }
    }
}


fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
