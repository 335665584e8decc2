//! Partial documents produced by the parsers
//!
//! A [`Fragment`] serializes as `{ "type": ..., "data": ..., "errors": [...] }`.

use indexmap::IndexMap;
use saphire_model::{BasicEvent, EndState, EventTree, FaultTree, ProjectInfo, Sequence};
use serde::{Deserialize, Serialize};

/// One row of a Basic-Event-Information file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicEventRow {
    /// Event id
    pub id: String,
    /// Probability, 0.0 when the field was empty
    pub probability: f64,
    /// Optional name column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional type column
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl BasicEventRow {
    /// Document entry: name falls back to the id, description to the name
    #[must_use]
    pub fn into_basic_event(self) -> BasicEvent {
        BasicEvent {
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            description: self.name.unwrap_or_default(),
            probability: self.probability,
            id: self.id,
        }
    }
}

/// Sequence row from a Sequence-List, Sequence-Logic or
/// Sequence-Description file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRow {
    /// Sequence id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// End state, when the format carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_state: Option<String>,
    /// Owning event tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_tree: Option<String>,
    /// Boolean logic text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    /// Flag set column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_set: Option<String>,
    /// Project column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl SequenceRow {
    /// Row named after its id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Top-level document sequence
    #[must_use]
    pub fn into_sequence(self) -> Sequence {
        Sequence {
            id: self.id,
            name: self.name,
            description: self.description,
            end_state: self.end_state.unwrap_or_default(),
        }
    }
}

/// Typed payload of a fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum FragmentData {
    /// Basic-Event-Information rows
    BasicEventInfo {
        /// Rows in file order
        basic_events: Vec<BasicEventRow>,
    },
    /// Fault trees keyed by name
    FaultTreeLogic {
        /// Trees in discovery order
        fault_trees: IndexMap<String, FaultTree>,
    },
    /// Event trees keyed by name
    EventTreeLogic {
        /// Trees in discovery order
        event_trees: IndexMap<String, EventTree>,
    },
    /// Project description
    ProjectDescription(ProjectInfo),
    /// Master reference file
    MardFile {
        /// File content as read
        raw_content: String,
        /// Fixed description
        description: String,
    },
    /// End-state descriptions
    EndStateDescription {
        /// End states in file order
        end_states: Vec<EndState>,
    },
    /// Sequence rows
    SequenceList {
        /// Rows in file order
        sequences: Vec<SequenceRow>,
    },
    /// JSON passthrough
    Json(serde_json::Value),
    /// No parser for the file
    Unknown,
}

/// Parser output: payload plus non-fatal errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Payload with its type tag
    #[serde(flatten)]
    pub data: FragmentData,
    /// Per-line or per-block problems
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Fragment {
    /// Fragment with no errors
    #[must_use]
    pub fn new(data: FragmentData) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Attach errors
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    /// Fragment for a file no parser handles
    #[must_use]
    pub fn unknown(label: &str) -> Self {
        Self::new(FragmentData::Unknown).with_errors(vec![format!("unknown file type: {label}")])
    }

    /// Serialized type tag
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match &self.data {
            FragmentData::BasicEventInfo { .. } => "basic_event_info",
            FragmentData::FaultTreeLogic { .. } => "fault_tree_logic",
            FragmentData::EventTreeLogic { .. } => "event_tree_logic",
            FragmentData::ProjectDescription(_) => "project_description",
            FragmentData::MardFile { .. } => "mard_file",
            FragmentData::EndStateDescription { .. } => "end_state_description",
            FragmentData::SequenceList { .. } => "sequence_list",
            FragmentData::Json(_) => "json",
            FragmentData::Unknown => "unknown",
        }
    }

    /// Whether parsing recorded no errors
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Event trees, when this is an event-tree fragment
    #[must_use]
    pub fn event_trees(&self) -> Option<&IndexMap<String, EventTree>> {
        match &self.data {
            FragmentData::EventTreeLogic { event_trees } => Some(event_trees),
            _ => None,
        }
    }

    /// Fault trees, when this is a fault-tree fragment
    #[must_use]
    pub fn fault_trees(&self) -> Option<&IndexMap<String, FaultTree>> {
        match &self.data {
            FragmentData::FaultTreeLogic { fault_trees } => Some(fault_trees),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_type_tag() {
        let fragment = Fragment::new(FragmentData::BasicEventInfo {
            basic_events: vec![BasicEventRow {
                id: "BE1".to_string(),
                probability: 0.5,
                name: None,
                event_type: None,
            }],
        });
        let value = serde_json::to_value(&fragment).unwrap();
        assert_eq!(value["type"], "basic_event_info");
        assert_eq!(value["data"]["basic_events"][0]["id"], "BE1");
        assert_eq!(value["errors"], json!([]));
        assert_eq!(fragment.kind(), "basic_event_info");
    }

    #[test]
    fn unknown_fragment_records_error() {
        let fragment = Fragment::unknown(".XYZ");
        assert_eq!(fragment.kind(), "unknown");
        assert!(!fragment.is_clean());
        assert!(fragment.errors[0].contains(".XYZ"));
    }

    #[test]
    fn basic_event_row_fallbacks() {
        let named = BasicEventRow {
            id: "BE1".to_string(),
            probability: 0.1,
            name: Some("Pump fails".to_string()),
            event_type: None,
        }
        .into_basic_event();
        assert_eq!(named.name, "Pump fails");
        assert_eq!(named.description, "Pump fails");

        let bare = BasicEventRow {
            id: "BE2".to_string(),
            probability: 0.2,
            name: None,
            event_type: Some("1".to_string()),
        }
        .into_basic_event();
        assert_eq!(bare.name, "BE2");
        assert_eq!(bare.description, "");
    }
}
