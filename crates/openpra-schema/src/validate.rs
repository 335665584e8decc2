//! Version-aware validation of OpenPRA JSON
//!
//! Top-level checks depend on the declared version; the model checks in
//! [`validate_models`] are shared by every version.

use crate::error::SchemaError;
use crate::instance::model_keys;
use crate::version::SchemaVersion;
use saphire_model::GateType;
use serde_json::{Map, Value};

const REQUIRED_KEYS: [&str; 3] = ["version", "metadata", "models"];
const LMP_LISTS: [&str; 2] = ["lbes", "sscs"];

/// Validate a document against the rules of its declared version
///
/// # Errors
/// The first structural problem found.
pub fn validate_document(document: &Value) -> Result<(), SchemaError> {
    let root = document
        .as_object()
        .ok_or_else(|| SchemaError::wrong_type("document", "an object"))?;

    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            return Err(SchemaError::MissingKey { key });
        }
    }

    let version: SchemaVersion = root["version"]
        .as_str()
        .ok_or_else(|| SchemaError::wrong_type("version", "a string"))?
        .parse()?;

    if !root["metadata"].is_object() {
        return Err(SchemaError::wrong_type("metadata", "an object"));
    }
    let models = root["models"]
        .as_object()
        .ok_or_else(|| SchemaError::wrong_type("models", "an object"))?;

    for key in model_keys(version) {
        if !models.get(*key).is_some_and(Value::is_array) {
            return Err(SchemaError::wrong_type(format!("models.{key}"), "a list"));
        }
    }

    if version.major() >= 2 {
        validate_lmp(root)?;
    }

    validate_models(models)
}

fn validate_lmp(root: &Map<String, Value>) -> Result<(), SchemaError> {
    let lmp = root
        .get("lmp")
        .ok_or(SchemaError::MissingKey { key: "lmp" })?
        .as_object()
        .ok_or_else(|| SchemaError::wrong_type("lmp", "an object"))?;

    for key in LMP_LISTS {
        if !lmp.get(key).is_some_and(Value::is_array) {
            return Err(SchemaError::wrong_type(format!("lmp.{key}"), "a list"));
        }
    }
    if !lmp.get("drm").is_some_and(Value::is_object) {
        return Err(SchemaError::wrong_type("lmp.drm", "an object"));
    }
    Ok(())
}

fn list<'a>(models: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    models
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn require_fields(
    item: &Value,
    kind: &'static str,
    index: usize,
    fields: &[&str],
) -> Result<(), SchemaError> {
    let object = item
        .as_object()
        .ok_or_else(|| SchemaError::invalid_model(kind, index, "must be an object"))?;
    for field in fields {
        if !object.contains_key(*field) {
            return Err(SchemaError::invalid_model(
                kind,
                index,
                format!("missing '{field}'"),
            ));
        }
    }
    Ok(())
}

/// Per-entry checks shared by every version
///
/// Fault trees need `id` and `gates`, event trees `id` and `sequences`,
/// basic events `id`. Gates that carry a type must use a recognized kind.
///
/// # Errors
/// The first malformed entry.
pub fn validate_models(models: &Map<String, Value>) -> Result<(), SchemaError> {
    for (index, tree) in list(models, "fault_trees").iter().enumerate() {
        require_fields(tree, "fault tree", index, &["id", "gates"])?;
        validate_gates(tree, index)?;
    }

    for (index, tree) in list(models, "event_trees").iter().enumerate() {
        require_fields(tree, "event tree", index, &["id", "sequences"])?;
    }

    for (index, event) in list(models, "basic_events").iter().enumerate() {
        require_fields(event, "basic event", index, &["id"])?;
    }

    Ok(())
}

fn validate_gates(tree: &Value, index: usize) -> Result<(), SchemaError> {
    let gates = tree["gates"]
        .as_array()
        .ok_or_else(|| SchemaError::invalid_model("fault tree", index, "gates must be a list"))?;
    let tree_id = tree["id"].as_str().unwrap_or_default();

    for gate in gates {
        let Some(gate_type) = gate.get("type").and_then(Value::as_str) else {
            continue;
        };
        if !GateType::is_recognized(gate_type) {
            return Err(SchemaError::InvalidGateType {
                tree: tree_id.to_string(),
                gate: gate["id"].as_str().unwrap_or_default().to_string(),
                gate_type: gate_type.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::empty_instance;
    use serde_json::json;

    #[test]
    fn missing_top_level_keys() {
        assert_eq!(
            validate_document(&json!({"metadata": {}, "models": {}})),
            Err(SchemaError::MissingKey { key: "version" })
        );
        assert_eq!(
            validate_document(&json!({"version": "2.0.0", "metadata": {}})),
            Err(SchemaError::MissingKey { key: "models" })
        );
    }

    #[test]
    fn unsupported_version_lists_supported() {
        let err = validate_document(&json!({"version": "9.9", "metadata": {}, "models": {}}))
            .unwrap_err();
        assert!(err.to_string().contains("Supported versions: 1.0.0, 1.1.0, 2.0.0"));
    }

    #[test]
    fn v2_requires_lmp_and_extra_lists() {
        let mut doc = empty_instance(SchemaVersion::V2_0_0);
        doc.as_object_mut().unwrap().remove("lmp");
        assert_eq!(
            validate_document(&doc),
            Err(SchemaError::MissingKey { key: "lmp" })
        );

        let mut doc = empty_instance(SchemaVersion::V2_0_0);
        doc["models"]["sequences"] = json!({});
        assert_eq!(
            validate_document(&doc).unwrap_err().to_string(),
            "models.sequences must be a list"
        );

        let mut doc = empty_instance(SchemaVersion::V2_0_0);
        doc["lmp"]["drm"] = json!([]);
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn v1_does_not_need_v2_sections() {
        let doc = empty_instance(SchemaVersion::V1_0_0);
        assert!(doc.get("lmp").is_none());
        assert_eq!(validate_document(&doc), Ok(()));
    }

    #[test]
    fn model_entries_are_checked() {
        let mut doc = empty_instance(SchemaVersion::V2_0_0);
        doc["models"]["fault_trees"] = json!([{"id": "FT1"}]);
        assert_eq!(
            validate_document(&doc).unwrap_err().to_string(),
            "fault tree at index 0 missing 'gates'"
        );

        doc["models"]["fault_trees"] = json!([]);
        doc["models"]["event_trees"] = json!(["not an object"]);
        assert_eq!(
            validate_document(&doc).unwrap_err().to_string(),
            "event tree at index 0 must be an object"
        );

        doc["models"]["event_trees"] = json!([]);
        doc["models"]["basic_events"] = json!([{"name": "x"}]);
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn gate_types_must_be_recognized() {
        let mut doc = empty_instance(SchemaVersion::V2_0_0);
        doc["models"]["fault_trees"] = json!([{
            "id": "FT1",
            "gates": [{"id": "G1", "type": "MAYBE", "inputs": []}]
        }]);
        assert_eq!(
            validate_document(&doc),
            Err(SchemaError::InvalidGateType {
                tree: "FT1".into(),
                gate: "G1".into(),
                gate_type: "MAYBE".into(),
            })
        );

        doc["models"]["fault_trees"][0]["gates"][0]["type"] = json!("TRAN");
        assert_eq!(validate_document(&doc), Ok(()));
    }
}
