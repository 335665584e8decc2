//! Structural validation of SAPHIRE-shaped JSON
//!
//! Validators take any JSON candidate (a serialized model type or an
//! object from an external source) and report the first problem found.
//! They never panic and never repair input: a probability of 1.5 is an
//! error, not a clamp.

use crate::document::UnifiedDocument;
use crate::gate::GateType;
use serde_json::{Map, Value};

/// Structural validation failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Candidate is not a JSON object
    #[error("{kind} must be an object")]
    NotAnObject {
        /// Kind of item checked
        kind: &'static str,
    },

    /// Required field absent
    #[error("{kind} missing required field '{field}'")]
    MissingField {
        /// Kind of item checked
        kind: &'static str,
        /// Absent field
        field: String,
    },

    /// Field present with the wrong JSON type
    #[error("{kind} field '{field}' must be {expected}")]
    WrongType {
        /// Kind of item checked
        kind: &'static str,
        /// Offending field
        field: String,
        /// Expected JSON type
        expected: &'static str,
    },

    /// Gate type outside the recognized kinds
    #[error("gate '{gate}' has invalid type '{gate_type}'")]
    InvalidGateType {
        /// Gate id
        gate: String,
        /// Offending token
        gate_type: String,
    },

    /// Probability outside [0, 1]
    #[error("basic event '{id}' probability {value} outside [0, 1]")]
    ProbabilityOutOfRange {
        /// Basic-event id
        id: String,
        /// Offending probability
        value: f64,
    },

    /// Failure inside a nested item
    #[error("{context}: {source}")]
    Nested {
        /// Location of the item, e.g. `fault_trees[2]`
        context: String,
        /// Failure inside the item
        #[source]
        source: Box<ValidationError>,
    },

    /// Typed value could not be turned into JSON
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ValidationError {
    /// Create missing-field error
    pub fn missing(kind: &'static str, field: impl Into<String>) -> Self {
        Self::MissingField {
            kind,
            field: field.into(),
        }
    }

    /// Create wrong-type error
    pub fn wrong_type(kind: &'static str, field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            kind,
            field: field.into(),
            expected,
        }
    }

    /// Wrap with the location of the failing item
    #[must_use]
    pub fn within(self, context: impl Into<String>) -> Self {
        Self::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Flatten a validation result into `(is_valid, message)`
#[must_use]
pub fn verdict(result: &Result<(), ValidationError>) -> (bool, String) {
    match result {
        Ok(()) => (true, "valid".to_string()),
        Err(err) => (false, err.to_string()),
    }
}

fn as_object<'a>(
    candidate: &'a Value,
    kind: &'static str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    candidate
        .as_object()
        .ok_or(ValidationError::NotAnObject { kind })
}

fn require<'a>(
    object: &'a Map<String, Value>,
    kind: &'static str,
    field: &str,
) -> Result<&'a Value, ValidationError> {
    object
        .get(field)
        .ok_or_else(|| ValidationError::missing(kind, field))
}

fn require_array<'a>(
    object: &'a Map<String, Value>,
    kind: &'static str,
    field: &str,
) -> Result<&'a Vec<Value>, ValidationError> {
    require(object, kind, field)?
        .as_array()
        .ok_or_else(|| ValidationError::wrong_type(kind, field, "an array"))
}

fn label(item: &Value, index: usize) -> String {
    match item.get("id").and_then(Value::as_str) {
        Some(id) => format!("'{id}'"),
        None => format!("#{index}"),
    }
}

/// Validate a fault-tree candidate
///
/// Requires `id`, `name`, `gates` and `basic_events`; every gate needs
/// `id`, `type` and `inputs`, with a recognized type.
///
/// # Errors
/// The first structural problem found.
pub fn validate_fault_tree(candidate: &Value) -> Result<(), ValidationError> {
    const KIND: &str = "fault tree";
    let object = as_object(candidate, KIND)?;

    for field in ["id", "name", "gates", "basic_events"] {
        require(object, KIND, field)?;
    }
    let gates = require_array(object, KIND, "gates")?;
    require_array(object, KIND, "basic_events")?;

    for (index, gate) in gates.iter().enumerate() {
        validate_gate(gate).map_err(|e| e.within(format!("gate {}", label(gate, index))))?;
    }
    Ok(())
}

fn validate_gate(candidate: &Value) -> Result<(), ValidationError> {
    const KIND: &str = "gate";
    let object = as_object(candidate, KIND)?;

    for field in ["id", "type", "inputs"] {
        require(object, KIND, field)?;
    }
    let gate_type = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::wrong_type(KIND, "type", "a string"))?;

    if !GateType::is_recognized(gate_type) {
        return Err(ValidationError::InvalidGateType {
            gate: object
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            gate_type: gate_type.to_string(),
        });
    }
    Ok(())
}

/// Validate an event-tree candidate
///
/// Requires `id`, `name`, `initiating_event` and `sequences`; every
/// sequence needs `id`, `path` and `end_state`.
///
/// # Errors
/// The first structural problem found.
pub fn validate_event_tree(candidate: &Value) -> Result<(), ValidationError> {
    const KIND: &str = "event tree";
    let object = as_object(candidate, KIND)?;

    for field in ["id", "name", "initiating_event", "sequences"] {
        require(object, KIND, field)?;
    }
    let sequences = require_array(object, KIND, "sequences")?;

    for (index, sequence) in sequences.iter().enumerate() {
        let seq = as_object(sequence, "sequence")
            .map_err(|e| e.within(format!("sequence #{index}")))?;
        for field in ["id", "path", "end_state"] {
            require(seq, "sequence", field)
                .map_err(|e| e.within(format!("sequence {}", label(sequence, index))))?;
        }
    }
    Ok(())
}

/// Validate a basic-event candidate
///
/// Requires `id`, `name` and a numeric `probability` in [0, 1].
///
/// # Errors
/// Missing fields, wrong types, or a probability outside [0, 1].
pub fn validate_basic_event(candidate: &Value) -> Result<(), ValidationError> {
    const KIND: &str = "basic event";
    let object = as_object(candidate, KIND)?;

    for field in ["id", "name", "probability"] {
        require(object, KIND, field)?;
    }
    let value = object
        .get("probability")
        .and_then(Value::as_f64)
        .ok_or_else(|| ValidationError::wrong_type(KIND, "probability", "a number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::ProbabilityOutOfRange {
            id: object
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            value,
        });
    }
    Ok(())
}

/// Validate a whole unified-document candidate
///
/// Checks the top-level shape, then every fault tree, event tree and
/// basic event.
///
/// # Errors
/// The first problem, wrapped with the location of the failing item.
pub fn validate_document(candidate: &Value) -> Result<(), ValidationError> {
    const KIND: &str = "document";
    let object = as_object(candidate, KIND)?;

    let project = require(object, KIND, "project")?;
    as_object(project, "project")?;

    for field in ["end_states", "sequences"] {
        require_array(object, KIND, field)?;
    }

    let checks: [(&str, fn(&Value) -> Result<(), ValidationError>); 3] = [
        ("fault_trees", validate_fault_tree),
        ("event_trees", validate_event_tree),
        ("basic_events", validate_basic_event),
    ];
    for (field, check) in checks {
        for (index, item) in require_array(object, KIND, field)?.iter().enumerate() {
            check(item).map_err(|e| e.within(format!("{field}[{index}]")))?;
        }
    }
    Ok(())
}

impl UnifiedDocument {
    /// Validate this document's JSON form
    ///
    /// # Errors
    /// See [`validate_document`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let value = serde_json::to_value(self)
            .map_err(|e| ValidationError::Serialization(e.to_string()))?;
        validate_document(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BasicEvent, EventSequence, EventTree, FaultTree, Gate, Reference};
    use serde_json::json;

    #[test]
    fn probability_bound() {
        for p in [1.5, -0.1] {
            let event = json!({"id": "BE1", "name": "BE1", "probability": p});
            assert!(matches!(
                validate_basic_event(&event),
                Err(ValidationError::ProbabilityOutOfRange { .. })
            ));
        }
        for p in [0.0, 0.01, 1.0] {
            let event = json!({"id": "BE1", "name": "BE1", "probability": p});
            assert!(validate_basic_event(&event).is_ok(), "p = {p}");
        }
        let integer = json!({"id": "BE1", "name": "BE1", "probability": 0});
        assert!(validate_basic_event(&integer).is_ok());
    }

    #[test]
    fn basic_event_requires_numeric_probability() {
        let event = json!({"id": "BE1", "name": "BE1", "probability": "0.1"});
        assert!(matches!(
            validate_basic_event(&event),
            Err(ValidationError::WrongType { .. })
        ));
        let event = json!({"id": "BE1", "probability": 0.1});
        assert_eq!(
            validate_basic_event(&event),
            Err(ValidationError::missing("basic event", "name"))
        );
    }

    #[test]
    fn fault_tree_gate_types() {
        let mut tree = FaultTree::new("FT1");
        tree.gates
            .push(Gate::new("G1", "AND").with_input(Reference::basic_event("BE1")));
        let value = serde_json::to_value(&tree).unwrap();
        assert!(validate_fault_tree(&value).is_ok());

        tree.gates.push(Gate::new("G2", "MAYBE"));
        let value = serde_json::to_value(&tree).unwrap();
        let err = validate_fault_tree(&value).unwrap_err();
        assert!(err.to_string().contains("MAYBE"), "{err}");
    }

    #[test]
    fn fault_tree_requires_fields() {
        let (valid, message) = verdict(&validate_fault_tree(&json!({"id": "FT1"})));
        assert!(!valid);
        assert!(message.contains("name"));
        assert!(validate_fault_tree(&json!([])).is_err());
    }

    #[test]
    fn event_tree_sequences_need_fields() {
        let mut tree = EventTree::new("T1").with_initiating_event("IE");
        tree.sequences.push(EventSequence::new("S1", "OK"));
        assert!(validate_event_tree(&serde_json::to_value(&tree).unwrap()).is_ok());

        let broken = json!({
            "id": "T1", "name": "T1", "initiating_event": "IE",
            "sequences": [{"id": "S1", "path": []}]
        });
        let err = validate_event_tree(&broken).unwrap_err();
        assert!(err.to_string().contains("end_state"), "{err}");
    }

    #[test]
    fn document_validation_descends() {
        let mut document = UnifiedDocument::new();
        document.basic_events.push(BasicEvent::new("BE1", 0.5));
        assert!(document.validate().is_ok());

        document.basic_events.push(BasicEvent::new("BE2", 2.0));
        let err = document.validate().unwrap_err();
        assert!(err.to_string().starts_with("basic_events[1]"), "{err}");
    }

    #[test]
    fn verdict_reports_success() {
        assert_eq!(verdict(&Ok(())), (true, "valid".to_string()));
    }
}
