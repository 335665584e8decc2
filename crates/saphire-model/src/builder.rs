//! Incremental document assembly
//!
//! Fragments from many files are folded into one [`UnifiedDocument`].
//! Each collection is keyed by id: the first discovery wins and
//! discovery order is kept. End states are the exception: an explicit
//! end state replaces one that was only inferred from an event-tree
//! sequence.

use crate::document::{
    BasicEvent, EndState, EventTree, FaultTree, ProjectInfo, Sequence, UnifiedDocument,
};
use indexmap::{IndexMap, IndexSet};

/// Outcome of adding one item to the builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// New id, stored
    Added,
    /// Id already present, item discarded
    Duplicate,
    /// Item not acceptable as a document entry
    Rejected(String),
}

impl Insertion {
    /// Whether the item was stored
    #[inline]
    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, Insertion::Added)
    }
}

/// Accumulates fragments into a [`UnifiedDocument`]
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    project: ProjectInfo,
    fault_trees: IndexMap<String, FaultTree>,
    event_trees: IndexMap<String, EventTree>,
    basic_events: IndexMap<String, BasicEvent>,
    end_states: IndexMap<String, EndState>,
    /// End-state ids that so far only come from sequences
    inferred: IndexSet<String>,
    sequences: IndexMap<String, Sequence>,
}

impl DocumentBuilder {
    /// Empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from an existing document
    ///
    /// End states that still equal their inferred placeholder stay
    /// replaceable by a later explicit end state.
    #[must_use]
    pub fn from_document(document: UnifiedDocument) -> Self {
        let mut builder = Self::new();
        builder.merge_project(document.project);
        for end_state in document.end_states {
            let placeholder = end_state == EndState::inferred(end_state.id.as_str());
            let id = end_state.id.clone();
            if builder.add_end_state(end_state).is_added() && placeholder {
                builder.inferred.insert(id);
            }
        }
        for tree in document.fault_trees {
            builder.add_fault_tree(tree);
        }
        for tree in document.event_trees {
            builder.add_event_tree(tree);
        }
        for event in document.basic_events {
            builder.add_basic_event(event);
        }
        for sequence in document.sequences {
            builder.add_sequence(sequence);
        }
        builder
    }

    /// Merge a project fragment (later fragments overwrite)
    pub fn merge_project(&mut self, project: ProjectInfo) {
        self.project.merge(project);
    }

    /// Add a fault tree
    pub fn add_fault_tree(&mut self, tree: FaultTree) -> Insertion {
        if tree.id.trim().is_empty() {
            return Insertion::Rejected("fault tree has empty id".to_string());
        }
        insert_first(&mut self.fault_trees, tree.id.clone(), tree)
    }

    /// Add an event tree and infer end states from its sequences
    ///
    /// Trees with an empty or `unknown` id are rejected.
    pub fn add_event_tree(&mut self, tree: EventTree) -> Insertion {
        if !tree.has_valid_id() {
            tracing::warn!("Skipping event tree with invalid id '{}'", tree.id);
            return Insertion::Rejected(format!("event tree has invalid id '{}'", tree.id));
        }
        if self.event_trees.contains_key(&tree.id) {
            return Insertion::Duplicate;
        }

        for sequence in &tree.sequences {
            self.infer_end_state(&sequence.end_state);
        }
        self.event_trees.insert(tree.id.clone(), tree);
        Insertion::Added
    }

    /// Add a basic event
    pub fn add_basic_event(&mut self, event: BasicEvent) -> Insertion {
        if event.id.trim().is_empty() {
            return Insertion::Rejected("basic event has empty id".to_string());
        }
        insert_first(&mut self.basic_events, event.id.clone(), event)
    }

    /// Add an explicit end state
    ///
    /// Replaces an inferred entry with the same id, keeping its position.
    pub fn add_end_state(&mut self, end_state: EndState) -> Insertion {
        if end_state.id.trim().is_empty() {
            return Insertion::Rejected("end state has empty id".to_string());
        }
        if self.inferred.shift_remove(&end_state.id) {
            self.end_states.insert(end_state.id.clone(), end_state);
            return Insertion::Added;
        }
        insert_first(&mut self.end_states, end_state.id.clone(), end_state)
    }

    /// Add a top-level sequence
    pub fn add_sequence(&mut self, sequence: Sequence) -> Insertion {
        if sequence.id.trim().is_empty() {
            return Insertion::Rejected("sequence has empty id".to_string());
        }
        insert_first(&mut self.sequences, sequence.id.clone(), sequence)
    }

    fn infer_end_state(&mut self, id: &str) {
        let id = id.trim();
        if id.is_empty() || self.end_states.contains_key(id) {
            return;
        }
        self.end_states
            .insert(id.to_string(), EndState::inferred(id));
        self.inferred.insert(id.to_string());
    }

    /// Whether an end state with this id exists only by inference
    #[must_use]
    pub fn is_inferred_end_state(&self, id: &str) -> bool {
        self.inferred.contains(id)
    }

    /// Current project info
    #[must_use]
    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    /// Number of event trees collected so far
    #[must_use]
    pub fn event_tree_count(&self) -> usize {
        self.event_trees.len()
    }

    /// Produce the document
    #[must_use]
    pub fn finish(self) -> UnifiedDocument {
        UnifiedDocument {
            project: self.project,
            fault_trees: self.fault_trees.into_values().collect(),
            event_trees: self.event_trees.into_values().collect(),
            basic_events: self.basic_events.into_values().collect(),
            end_states: self.end_states.into_values().collect(),
            sequences: self.sequences.into_values().collect(),
        }
    }
}

fn insert_first<T>(map: &mut IndexMap<String, T>, key: String, value: T) -> Insertion {
    if map.contains_key(&key) {
        return Insertion::Duplicate;
    }
    map.insert(key, value);
    Insertion::Added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EventSequence;
    use pretty_assertions::assert_eq;

    fn tree(id: &str, end_states: &[&str]) -> EventTree {
        let mut tree = EventTree::new(id);
        for (i, es) in end_states.iter().enumerate() {
            tree.sequences
                .push(EventSequence::new(format!("S{}", i + 1), *es));
        }
        tree
    }

    #[test]
    fn first_discovery_wins() {
        let mut builder = DocumentBuilder::new();
        assert_eq!(
            builder.add_basic_event(BasicEvent::new("BE1", 0.1)),
            Insertion::Added
        );
        assert_eq!(
            builder.add_basic_event(BasicEvent::new("BE1", 0.9)),
            Insertion::Duplicate
        );

        let document = builder.finish();
        assert_eq!(document.basic_events.len(), 1);
        assert!((document.basic_events[0].probability - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_event_trees_are_rejected() {
        let mut builder = DocumentBuilder::new();
        assert!(matches!(
            builder.add_event_tree(tree("unknown", &["OK"])),
            Insertion::Rejected(_)
        ));
        assert!(matches!(
            builder.add_event_tree(tree("", &[])),
            Insertion::Rejected(_)
        ));

        let document = builder.finish();
        assert!(document.event_trees.is_empty());
        // Rejected trees contribute no end states
        assert!(document.end_states.is_empty());
    }

    #[test]
    fn end_states_inferred_once() {
        let mut builder = DocumentBuilder::new();
        builder.add_event_tree(tree("T1", &["OK", "CD", "OK"]));
        builder.add_event_tree(tree("T2", &["CD", ""]));

        let document = builder.finish();
        let ids: Vec<&str> = document.end_states.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["OK", "CD"]);
        assert_eq!(document.end_states[0].description, "End state OK");
    }

    #[test]
    fn explicit_end_state_replaces_inferred() {
        let mut builder = DocumentBuilder::new();
        builder.add_event_tree(tree("T1", &["OK", "CD"]));
        assert!(builder.is_inferred_end_state("CD"));

        let result = builder.add_end_state(EndState::new("CD", "Core damage"));
        assert_eq!(result, Insertion::Added);
        assert!(!builder.is_inferred_end_state("CD"));

        // A second explicit description does not replace the first
        assert_eq!(
            builder.add_end_state(EndState::new("CD", "Other")),
            Insertion::Duplicate
        );

        let document = builder.finish();
        assert_eq!(document.end_states.len(), 2);
        assert_eq!(document.end_states[1].id, "CD");
        assert_eq!(document.end_states[1].description, "Core damage");
    }

    #[test]
    fn explicit_end_state_blocks_inference() {
        let mut builder = DocumentBuilder::new();
        builder.add_end_state(EndState::new("OK", "Success"));
        builder.add_event_tree(tree("T1", &["OK"]));

        let document = builder.finish();
        assert_eq!(document.end_states.len(), 1);
        assert_eq!(document.end_states[0].description, "Success");
    }

    #[test]
    fn from_document_round_trips() {
        let mut builder = DocumentBuilder::new();
        builder.merge_project(ProjectInfo::new("P"));
        builder.add_fault_tree(FaultTree::new("FT1"));
        builder.add_event_tree(tree("T1", &["OK"]));
        builder.add_sequence(Sequence::new("SEQ1"));
        let document = builder.finish();

        let rebuilt = DocumentBuilder::from_document(document.clone()).finish();
        assert_eq!(rebuilt, document);
    }

    #[test]
    fn reseeded_placeholder_end_state_stays_replaceable() {
        let mut builder = DocumentBuilder::new();
        builder.add_event_tree(tree("T1", &["OK", "CD"]));
        builder.add_end_state(EndState::new("OK", "Success"));
        let document = builder.finish();

        let mut builder = DocumentBuilder::from_document(document);
        assert!(builder.is_inferred_end_state("CD"));
        assert!(!builder.is_inferred_end_state("OK"));

        assert_eq!(
            builder.add_end_state(EndState::new("CD", "Core damage")),
            Insertion::Added
        );
        assert_eq!(
            builder.add_end_state(EndState::new("OK", "Other")),
            Insertion::Duplicate
        );

        let document = builder.finish();
        let descriptions: Vec<&str> = document
            .end_states
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Success", "Core damage"]);
    }
}
