//! SAPHIRE → OpenPRA conversion

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::normalize::{normalize_gate_type, normalize_path};
use crate::source::{
    ConversionInput, LegacyEntry, SkippedItem, SourceBasicEvent, SourceEndState,
    SourceEventTree, SourceFaultTree, SourceModel, SourceSequenceEntry,
};
use openpra_schema::{
    BasicEventModel, EndStateModel, EventTreeModel, FaultTreeModel, GateInput, GateModel, IdRef,
    InitiatingEventModel, OpenPraDocument, SchemaError, SequenceModel, TreeSequence,
};
use saphire_model::{GateType, UNKNOWN_ID};
use serde_json::Value;

/// Converted document plus its validation outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Produced document
    pub document: OpenPraDocument,
    /// First problem found: a skipped source entry, else a schema
    /// violation. `Ok` when neither occurred or validation was disabled
    /// and nothing was skipped.
    pub validation: Result<(), SchemaError>,
    /// Source entries left out of the document
    pub skipped: Vec<SkippedItem>,
}

impl Conversion {
    /// Check if the document passed validation
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }

    /// `(is_valid, message)`, message `"valid"` on success
    #[must_use]
    pub fn verdict(&self) -> (bool, String) {
        match &self.validation {
            Ok(()) => (true, "valid".to_string()),
            Err(e) => (false, e.to_string()),
        }
    }

    /// Record source entries that were left out
    ///
    /// The first one becomes the validation outcome unless a schema
    /// violation was already found.
    pub fn note_skipped(&mut self, skipped: Vec<SkippedItem>) {
        if let (Ok(()), Some(first)) = (&self.validation, skipped.first()) {
            self.validation = Err(SchemaError::SkippedInput {
                location: first.location.clone(),
                reason: first.reason.clone(),
            });
        }
        self.skipped.extend(skipped);
    }

    /// Document as JSON
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_value(&self) -> Result<Value, ConvertError> {
        Ok(self.document.to_value()?)
    }
}

/// Produces OpenPRA documents from SAPHIRE models
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

fn text(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

impl Converter {
    /// Create converter
    #[must_use]
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert an interpreted input
    ///
    /// Validation failure is logged and reported in the result; it never
    /// withholds the document.
    #[must_use]
    pub fn convert(&self, input: &ConversionInput) -> Conversion {
        let mut document = OpenPraDocument::new();
        document.metadata.title.clone_from(&self.config.fallback_title);
        document.metadata.source.clone_from(&self.config.source_label);

        match input {
            ConversionInput::Job {
                job_id,
                file_count,
                model,
            } => {
                document.metadata.job_id = Some(job_id.clone());
                document.metadata.file_count = Some(*file_count);
                document.metadata.description = format!("Data from job {job_id}");
                convert_model(model, &mut document);
            }
            ConversionInput::Direct(model) => convert_model(model, &mut document),
            ConversionInput::Legacy(entries) => {
                for entry in entries {
                    match entry {
                        LegacyEntry::FaultTree(tree) => {
                            document.models.fault_trees.push(convert_fault_tree(tree));
                        }
                        LegacyEntry::EventTree(tree) => {
                            document.models.event_trees.push(convert_event_tree(tree));
                        }
                        LegacyEntry::BasicEvent(event) => {
                            document.models.basic_events.push(convert_basic_event(event));
                        }
                    }
                }
            }
        }

        fill_initiating_events(&mut document);

        let validation = if self.config.validate_output {
            document.validate()
        } else {
            Ok(())
        };
        if let Err(e) = &validation {
            tracing::warn!("Generated OpenPRA model is not valid: {}", e);
        }

        let models = &document.models;
        tracing::info!(
            "Converted {} fault trees, {} event trees, {} basic events, {} end states",
            models.fault_trees.len(),
            models.event_trees.len(),
            models.basic_events.len(),
            models.end_states.len()
        );

        Conversion {
            document,
            validation,
            skipped: Vec::new(),
        }
    }

    /// Interpret raw JSON and convert it
    ///
    /// Entries that do not fit their shape are left out of the document
    /// and reported in [`Conversion::skipped`] and
    /// [`Conversion::validation`].
    ///
    /// # Errors
    /// Input is not a JSON object.
    pub fn convert_value(&self, value: &Value) -> Result<Conversion, ConvertError> {
        let parsed = ConversionInput::parse(value)?;
        let mut conversion = self.convert(&parsed.input);
        if !parsed.skipped.is_empty() {
            tracing::warn!(
                "{} source entries could not be read and were left out",
                parsed.skipped.len()
            );
        }
        conversion.note_skipped(parsed.skipped);
        Ok(conversion)
    }
}

fn convert_model(model: &SourceModel, document: &mut OpenPraDocument) {
    if let Some(project) = model.project.as_ref().filter(|p| !p.is_blank()) {
        let name = project
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unnamed");
        document.metadata.title = format!("PRA Model: {name}");
        if let Some(description) = project.description.as_ref().filter(|d| !d.is_empty()) {
            document.metadata.description.clone_from(description);
        }
        document
            .metadata
            .attributes
            .extend(project.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let models = &mut document.models;
    models
        .fault_trees
        .extend(model.fault_trees.iter().map(convert_fault_tree));
    models
        .event_trees
        .extend(model.event_trees.iter().map(convert_event_tree));
    models
        .basic_events
        .extend(model.basic_events.iter().map(convert_basic_event));
    models
        .end_states
        .extend(model.end_states.iter().map(convert_end_state));
    models
        .sequences
        .extend(model.sequences.iter().map(convert_sequence));
}

/// Convert one fault tree; gate inputs keep a declared kind
#[must_use]
pub fn convert_fault_tree(tree: &SourceFaultTree) -> FaultTreeModel {
    FaultTreeModel {
        id: text(tree.id.as_deref(), UNKNOWN_ID),
        name: text(tree.name.as_deref(), "Unnamed Fault Tree"),
        description: text(tree.description.as_deref(), ""),
        gates: tree
            .gates
            .iter()
            .map(|gate| GateModel {
                id: text(gate.id.as_deref(), UNKNOWN_ID),
                gate_type: gate
                    .gate_type
                    .as_deref()
                    .map_or(GateType::Or, normalize_gate_type),
                inputs: gate
                    .inputs
                    .iter()
                    .map(|input| GateInput {
                        id: input.id().to_string(),
                        kind: input.kind(),
                    })
                    .collect(),
            })
            .collect(),
        basic_events: tree
            .basic_events
            .iter()
            .map(|r| IdRef::new(r.id()))
            .collect(),
        attributes: tree.attributes.clone().unwrap_or_default(),
    }
}

/// Convert one event tree and its sequence paths
#[must_use]
pub fn convert_event_tree(tree: &SourceEventTree) -> EventTreeModel {
    EventTreeModel {
        id: text(tree.id.as_deref(), UNKNOWN_ID),
        name: text(tree.name.as_deref(), "Unnamed Event Tree"),
        description: text(tree.description.as_deref(), ""),
        initiating_event: text(tree.initiating_event.as_deref(), ""),
        sequences: tree
            .sequences
            .iter()
            .map(|seq| TreeSequence {
                id: text(seq.id.as_deref(), UNKNOWN_ID),
                end_state: text(seq.end_state.as_deref(), ""),
                path: normalize_path(&seq.path),
            })
            .collect(),
        attributes: tree.attributes.clone().unwrap_or_default(),
    }
}

/// Convert one basic event; probability defaults to 0
#[must_use]
pub fn convert_basic_event(event: &SourceBasicEvent) -> BasicEventModel {
    BasicEventModel {
        id: text(event.id.as_deref(), UNKNOWN_ID),
        name: text(event.name.as_deref(), "Unnamed Basic Event"),
        probability: event.probability.unwrap_or(0.0),
        description: text(event.description.as_deref(), ""),
        attributes: event.attributes.clone().unwrap_or_default(),
    }
}

/// Convert one end state
#[must_use]
pub fn convert_end_state(end_state: &SourceEndState) -> EndStateModel {
    EndStateModel {
        id: text(end_state.id.as_deref(), UNKNOWN_ID),
        name: text(end_state.name.as_deref(), "Unnamed End State"),
        description: text(end_state.description.as_deref(), ""),
        attributes: end_state.attributes.clone().unwrap_or_default(),
    }
}

/// Convert one top-level sequence
#[must_use]
pub fn convert_sequence(sequence: &SourceSequenceEntry) -> SequenceModel {
    SequenceModel {
        id: text(sequence.id.as_deref(), UNKNOWN_ID),
        name: text(sequence.name.as_deref(), "Unnamed Sequence"),
        description: text(sequence.description.as_deref(), ""),
        end_state: text(sequence.end_state.as_deref(), ""),
        attributes: sequence.attributes.clone().unwrap_or_default(),
    }
}

/// Add one initiating event per distinct event-tree initiator not yet listed
fn fill_initiating_events(document: &mut OpenPraDocument) {
    let models = &mut document.models;
    for tree in &models.event_trees {
        let id = &tree.initiating_event;
        if id.is_empty() || models.initiating_events.iter().any(|ie| &ie.id == id) {
            continue;
        }
        models.initiating_events.push(InitiatingEventModel {
            id: id.clone(),
            name: id.clone(),
            description: format!("Initiating event of event tree {}", tree.id),
            attributes: serde_json::Map::new(),
        });
    }
}

/// Convert raw JSON with the default configuration
///
/// # Errors
/// Input not interpretable, or output not serializable.
pub fn to_openpra(value: &Value) -> Result<Value, ConvertError> {
    Converter::default().convert_value(value)?.to_value()
}
