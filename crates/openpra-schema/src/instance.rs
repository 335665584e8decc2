//! Fresh JSON instances per schema version
//!
//! Every call builds a new value; nothing is shared between callers.

use crate::version::SchemaVersion;
use serde_json::{json, Value};

/// Model collections required by 1.x documents
pub const V1_MODEL_KEYS: [&str; 4] = ["fault_trees", "event_trees", "basic_events", "end_states"];

/// Model collections required by 2.x documents
pub const V2_MODEL_KEYS: [&str; 6] = [
    "fault_trees",
    "event_trees",
    "basic_events",
    "initiating_events",
    "end_states",
    "sequences",
];

/// Model keys required at `version`
#[must_use]
pub fn model_keys(version: SchemaVersion) -> &'static [&'static str] {
    match version.major() {
        1 => &V1_MODEL_KEYS,
        _ => &V2_MODEL_KEYS,
    }
}

/// Empty, valid document at `version`
#[must_use]
pub fn empty_instance(version: SchemaVersion) -> Value {
    let models: serde_json::Map<String, Value> = model_keys(version)
        .iter()
        .map(|key| ((*key).to_string(), json!([])))
        .collect();

    let mut instance = json!({
        "version": version.as_str(),
        "metadata": {
            "title": "",
            "description": "",
            "created_date": chrono::Utc::now().to_rfc3339(),
            "source": "",
            "schema_version": version.as_str(),
            "attributes": {}
        },
        "models": models,
        "analysis": {
            "quantifications": [],
            "importance_measures": [],
            "uncertainty": {}
        }
    });

    if version.major() >= 2 {
        instance["lmp"] = empty_lmp();
    }
    instance
}

/// Empty LMP section
#[must_use]
pub fn empty_lmp() -> Value {
    json!({ "lbes": [], "sscs": [], "drm": {} })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_document;

    #[test]
    fn every_version_instance_is_valid() {
        for version in SchemaVersion::ALL {
            let instance = empty_instance(version);
            assert_eq!(validate_document(&instance), Ok(()), "{version}");
            assert_eq!(instance["version"], version.as_str());
        }
    }

    #[test]
    fn instances_are_independent() {
        let mut a = empty_instance(SchemaVersion::V2_0_0);
        let b = empty_instance(SchemaVersion::V2_0_0);
        a["models"]["fault_trees"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": "FT"}));
        assert_eq!(b["models"]["fault_trees"], json!([]));
    }

    #[test]
    fn v1_shape() {
        let instance = empty_instance(SchemaVersion::V1_1_0);
        assert!(instance.get("lmp").is_none());
        assert!(instance["models"].get("sequences").is_none());
        assert_eq!(instance["models"].as_object().unwrap().len(), 4);
    }
}
