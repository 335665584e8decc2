//! Unified document types
//!
//! Every type here is plain data: serde round-trippable, cheap to clone,
//! and tolerant on input (`#[serde(default)]` on optional collections).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder id that real exports use for unnamed event trees
pub const UNKNOWN_ID: &str = "unknown";

/// Project-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Additional key/value attributes
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

impl ProjectInfo {
    /// Create project info with a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Fold a later fragment into this one
    ///
    /// Non-empty fields of `other` overwrite; attributes are extended.
    pub fn merge(&mut self, other: ProjectInfo) {
        if !other.name.is_empty() {
            self.name = other.name;
        }
        if !other.description.is_empty() {
            self.description = other.description;
        }
        self.attributes.extend(other.attributes);
    }

    /// True when nothing has been populated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.attributes.is_empty()
    }
}

/// What a gate input points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Another gate in the same tree
    Gate,
    /// A basic event
    BasicEvent,
}

impl ReferenceKind {
    /// Serialized tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Gate => "gate",
            ReferenceKind::BasicEvent => "basic_event",
        }
    }

    /// Prefix heuristic for ids that are not otherwise known
    #[must_use]
    pub fn from_prefix(id: &str) -> Self {
        if id.starts_with('G') {
            ReferenceKind::Gate
        } else {
            ReferenceKind::BasicEvent
        }
    }
}

/// Typed gate input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Referenced id
    pub id: String,
    /// Referenced kind
    pub kind: ReferenceKind,
}

impl Reference {
    /// Reference to a gate
    #[must_use]
    pub fn gate(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ReferenceKind::Gate,
        }
    }

    /// Reference to a basic event
    #[must_use]
    pub fn basic_event(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ReferenceKind::BasicEvent,
        }
    }

    /// Whether this points at a gate
    #[inline]
    #[must_use]
    pub fn is_gate(&self) -> bool {
        self.kind == ReferenceKind::Gate
    }
}

/// Fault-tree gate
///
/// The type token is kept as read (upper-cased). Recognized kinds are
/// enforced by validation and normalized during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Gate id
    pub id: String,
    /// Gate type token
    #[serde(rename = "type")]
    pub gate_type: String,
    /// Inputs in file order
    #[serde(default)]
    pub inputs: Vec<Reference>,
}

impl Gate {
    /// Create a gate with no inputs
    #[must_use]
    pub fn new(id: impl Into<String>, gate_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gate_type: gate_type.into().to_uppercase(),
            inputs: Vec::new(),
        }
    }

    /// Append an input
    #[must_use]
    pub fn with_input(mut self, input: Reference) -> Self {
        self.inputs.push(input);
        self
    }
}

/// Fault tree: gates over basic events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultTree {
    /// Tree id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Gates in discovery order
    #[serde(default)]
    pub gates: Vec<Gate>,
    /// Referenced basic-event ids, discovery order, no duplicates
    #[serde(default)]
    pub basic_events: Vec<String>,
}

impl FaultTree {
    /// Create an empty tree whose name equals its id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Look up a gate by id
    #[must_use]
    pub fn gate(&self, id: &str) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    /// Record a basic-event reference once
    pub fn note_basic_event(&mut self, id: &str) {
        if !self.basic_events.iter().any(|e| e == id) {
            self.basic_events.push(id.to_string());
        }
    }
}

/// Event-tree branch point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopEvent {
    /// Top-event id
    pub id: String,
    /// Description
    #[serde(default)]
    pub description: String,
}

impl TopEvent {
    /// Top event with an empty description
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
        }
    }
}

/// One branch traversal of an event tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSequence {
    /// Sequence id
    pub id: String,
    /// Terminal outcome
    #[serde(default)]
    pub end_state: String,
    /// Logic-node references from the LOGIC section
    #[serde(default)]
    pub path: Vec<String>,
}

impl EventSequence {
    /// Sequence with an empty path
    #[must_use]
    pub fn new(id: impl Into<String>, end_state: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            end_state: end_state.into(),
            path: Vec::new(),
        }
    }
}

/// Node substitution from a NODESUBS section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSubstitution {
    /// Original node reference
    pub original: String,
    /// Replacement
    pub substitute: String,
}

/// Event tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTree {
    /// Tree id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Initiating event (third header field)
    #[serde(default)]
    pub initiating_event: String,
    /// Top events in column order
    #[serde(default)]
    pub top_events: Vec<TopEvent>,
    /// Sequences in row order
    #[serde(default)]
    pub sequences: Vec<EventSequence>,
    /// Node position to description text
    #[serde(default)]
    pub node_descriptions: IndexMap<String, String>,
    /// Node position to substitution
    #[serde(default)]
    pub node_substitutions: IndexMap<String, NodeSubstitution>,
}

impl EventTree {
    /// Empty tree whose name equals its id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Set initiating event
    #[must_use]
    pub fn with_initiating_event(mut self, ie: impl Into<String>) -> Self {
        self.initiating_event = ie.into();
        self
    }

    /// Whether the id is usable as a document key
    ///
    /// Empty ids and the `unknown` placeholder (any case) are not.
    #[must_use]
    pub fn has_valid_id(&self) -> bool {
        let id = self.id.trim();
        !id.is_empty() && !id.eq_ignore_ascii_case(UNKNOWN_ID)
    }

    /// Mutable lookup of a sequence by id
    pub fn sequence_mut(&mut self, id: &str) -> Option<&mut EventSequence> {
        self.sequences.iter_mut().find(|s| s.id == id)
    }
}

/// Atomic failure mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicEvent {
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
}

impl BasicEvent {
    /// Basic event named after its id
    #[must_use]
    pub fn new(id: impl Into<String>, probability: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            probability,
            description: String::new(),
        }
    }
}

/// Terminal outcome classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndState {
    /// End-state id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
}

impl EndState {
    /// Explicit end state
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: description.into(),
        }
    }

    /// End state inferred from an event-tree sequence
    #[must_use]
    pub fn inferred(id: impl Into<String>) -> Self {
        let id = id.into();
        let description = Self::placeholder_description(&id);
        Self::new(id, description)
    }

    /// Placeholder description used for inferred end states
    #[must_use]
    pub fn placeholder_description(id: &str) -> String {
        format!("End state {id}")
    }
}

/// Top-level sequence, independent of a specific event tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Sequence id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// End state, when known
    #[serde(default)]
    pub end_state: String,
}

impl Sequence {
    /// Sequence named after its id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set end state
    #[must_use]
    pub fn with_end_state(mut self, end_state: impl Into<String>) -> Self {
        self.end_state = end_state.into();
        self
    }
}

/// Aggregated SAPHIRE model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedDocument {
    /// Project metadata
    #[serde(default)]
    pub project: ProjectInfo,
    /// Fault trees
    #[serde(default)]
    pub fault_trees: Vec<FaultTree>,
    /// Event trees
    #[serde(default)]
    pub event_trees: Vec<EventTree>,
    /// Basic events
    #[serde(default)]
    pub basic_events: Vec<BasicEvent>,
    /// End states, explicit and inferred
    #[serde(default)]
    pub end_states: Vec<EndState>,
    /// Top-level sequences
    #[serde(default)]
    pub sequences: Vec<Sequence>,
}

impl UnifiedDocument {
    /// Empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection sizes
    #[must_use]
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            fault_trees: self.fault_trees.len(),
            event_trees: self.event_trees.len(),
            basic_events: self.basic_events.len(),
            end_states: self.end_states.len(),
            sequences: self.sequences.len(),
        }
    }

    /// True when every collection is empty and no project info was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project.is_empty() && self.summary().total() == 0
    }
}

/// Per-collection counts of a [`UnifiedDocument`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Number of fault trees
    pub fault_trees: usize,
    /// Number of event trees
    pub event_trees: usize,
    /// Number of basic events
    pub basic_events: usize,
    /// Number of end states
    pub end_states: usize,
    /// Number of top-level sequences
    pub sequences: usize,
}

impl DocumentSummary {
    /// Sum over all collections
    #[must_use]
    pub fn total(&self) -> usize {
        self.fault_trees + self.event_trees + self.basic_events + self.end_states + self.sequences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn project_merge_overwrites_non_empty_fields() {
        let mut project = ProjectInfo::new("HTGR").with_description("first");
        project.merge(ProjectInfo::default().with_attribute("rev", "2"));
        assert_eq!(project.name, "HTGR");
        assert_eq!(project.description, "first");

        project.merge(ProjectInfo::new("HTGR-2"));
        assert_eq!(project.name, "HTGR-2");
        assert_eq!(project.attributes.get("rev").map(String::as_str), Some("2"));
    }

    #[test]
    fn unknown_event_tree_ids_are_invalid() {
        assert!(EventTree::new("LOSP").has_valid_id());
        assert!(!EventTree::new("").has_valid_id());
        assert!(!EventTree::new("  ").has_valid_id());
        assert!(!EventTree::new("Unknown").has_valid_id());
    }

    #[test]
    fn gate_serializes_type_field() {
        let gate = Gate::new("G1", "and").with_input(Reference::basic_event("BE1"));
        let value = serde_json::to_value(&gate).unwrap();
        assert_eq!(value["type"], "AND");
        assert_eq!(value["inputs"][0]["kind"], "basic_event");
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut tree = EventTree::new("T1").with_initiating_event("IE-T1");
        tree.top_events.push(TopEvent::new("A"));
        tree.sequences.push(EventSequence::new("S1", "OK"));
        tree.node_substitutions.insert(
            "3".to_string(),
            NodeSubstitution {
                original: "A".to_string(),
                substitute: "B".to_string(),
            },
        );

        let document = UnifiedDocument {
            project: ProjectInfo::new("P"),
            event_trees: vec![tree],
            basic_events: vec![BasicEvent::new("BE1", 0.01)],
            end_states: vec![EndState::inferred("OK")],
            ..UnifiedDocument::default()
        };

        let json = serde_json::to_string(&document).unwrap();
        let back: UnifiedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn inferred_end_state_uses_placeholder() {
        let state = EndState::inferred("CD");
        assert_eq!(state.description, "End state CD");
        assert_eq!(state.name, "CD");
    }

    #[test]
    fn prefix_heuristic() {
        assert_eq!(ReferenceKind::from_prefix("G-TOP"), ReferenceKind::Gate);
        assert_eq!(ReferenceKind::from_prefix("PUMP-A"), ReferenceKind::BasicEvent);
    }
}
