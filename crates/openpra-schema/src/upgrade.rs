//! Version upgrades
//!
//! Versions are nodes of a directed graph and every edge carries one
//! upgrade step. Upgrading follows the shortest chain of steps from the
//! source version to the target. Steps only add: every field present in
//! the source survives, missing keys are inserted with empty defaults.

use crate::error::UpgradeError;
use crate::instance::{empty_lmp, V2_MODEL_KEYS};
use crate::version::SchemaVersion;
use petgraph::algo::astar;
use petgraph::graphmap::DiGraphMap;
use serde_json::{json, Map, Value};

/// One upgrade step over a document object
pub type UpgradeStep = fn(&mut Map<String, Value>);

/// Result of a successful upgrade
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    /// Upgraded document
    pub document: Value,
    /// Versions visited, source first
    pub path: Vec<SchemaVersion>,
}

impl Upgrade {
    /// No step was applied
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.path.len() <= 1
    }

    /// Human-readable summary
    #[must_use]
    pub fn message(&self) -> String {
        match (self.path.first(), self.path.last()) {
            (Some(from), Some(to)) if !self.is_noop() => {
                format!("Upgraded from {from} to {to}")
            }
            _ => "Already at target version".to_string(),
        }
    }
}

/// Graph of versions connected by upgrade steps
#[derive(Debug, Clone)]
pub struct UpgradeGraph {
    graph: DiGraphMap<SchemaVersion, UpgradeStep>,
}

impl UpgradeGraph {
    /// Graph with every version and no steps
    #[must_use]
    pub fn new() -> Self {
        let mut graph = DiGraphMap::new();
        for version in SchemaVersion::ALL {
            graph.add_node(version);
        }
        Self { graph }
    }

    /// Graph with the published steps 1.0.0 → 1.1.0 → 2.0.0
    #[must_use]
    pub fn standard() -> Self {
        let mut graph = Self::new();
        graph.add_step(SchemaVersion::V1_0_0, SchemaVersion::V1_1_0, upgrade_1_0_to_1_1);
        graph.add_step(SchemaVersion::V1_1_0, SchemaVersion::V2_0_0, upgrade_1_1_to_2_0);
        graph
    }

    /// Register a step; replaces any step already on that edge
    pub fn add_step(&mut self, from: SchemaVersion, to: SchemaVersion, step: UpgradeStep) {
        self.graph.add_edge(from, to, step);
    }

    /// Number of registered steps
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Shortest chain of versions from `from` to `to`, both included
    #[must_use]
    pub fn path(&self, from: SchemaVersion, to: SchemaVersion) -> Option<Vec<SchemaVersion>> {
        astar(&self.graph, from, |v| v == to, |_| 1u32, |_| 0u32).map(|(_, path)| path)
    }

    /// Upgrade `document` to `target`
    ///
    /// # Errors
    /// Missing or unknown source version, or no path to `target`.
    pub fn upgrade(&self, document: &Value, target: SchemaVersion) -> Result<Upgrade, UpgradeError> {
        let object = document.as_object().ok_or(UpgradeError::NotAnObject)?;
        let from: SchemaVersion = object
            .get("version")
            .and_then(Value::as_str)
            .ok_or(UpgradeError::MissingVersion)?
            .parse()?;

        let path = self
            .path(from, target)
            .ok_or(UpgradeError::NoUpgradePath { from, to: target })?;

        let mut upgraded = object.clone();
        for pair in path.windows(2) {
            let (step_from, step_to) = (pair[0], pair[1]);
            if let Some(step) = self.graph.edge_weight(step_from, step_to) {
                step(&mut upgraded);
                stamp_version(&mut upgraded, step_to);
                tracing::info!("Upgraded schema from {} to {}", step_from, step_to);
            }
        }

        Ok(Upgrade {
            document: Value::Object(upgraded),
            path,
        })
    }
}

impl Default for UpgradeGraph {
    fn default() -> Self {
        Self::standard()
    }
}

/// Upgrade with the standard graph
///
/// # Errors
/// See [`UpgradeGraph::upgrade`].
pub fn upgrade_document(document: &Value, target: SchemaVersion) -> Result<Upgrade, UpgradeError> {
    UpgradeGraph::standard().upgrade(document, target)
}

fn stamp_version(document: &mut Map<String, Value>, version: SchemaVersion) {
    document.insert("version".to_string(), json!(version.as_str()));
    let metadata = document
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(metadata) = metadata.as_object_mut() {
        metadata.insert("schema_version".to_string(), json!(version.as_str()));
    }
}

fn models_mut(document: &mut Map<String, Value>) -> Option<&mut Map<String, Value>> {
    document
        .entry("models")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
}

/// 1.0.0 → 1.1.0: every model entry gains an `attributes` object
pub fn upgrade_1_0_to_1_1(document: &mut Map<String, Value>) {
    let Some(models) = models_mut(document) else {
        return;
    };
    for key in ["fault_trees", "event_trees", "basic_events", "end_states"] {
        let Some(entries) = models.get_mut(key).and_then(Value::as_array_mut) else {
            continue;
        };
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            entry
                .entry("attributes")
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }
}

/// 1.1.0 → 2.0.0: new model lists and the LMP section
pub fn upgrade_1_1_to_2_0(document: &mut Map<String, Value>) {
    if let Some(models) = models_mut(document) {
        for key in V2_MODEL_KEYS {
            models.entry(key).or_insert_with(|| json!([]));
        }
    }

    document.entry("analysis").or_insert_with(|| {
        json!({ "quantifications": [], "importance_measures": [], "uncertainty": {} })
    });

    let lmp = document.entry("lmp").or_insert_with(empty_lmp);
    if let (Some(lmp), Value::Object(defaults)) = (lmp.as_object_mut(), empty_lmp()) {
        for (key, value) in defaults {
            lmp.entry(key).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::empty_instance;
    use crate::validate::validate_document;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_graph_paths() {
        let graph = UpgradeGraph::standard();
        assert_eq!(graph.step_count(), 2);
        assert_eq!(
            graph.path(SchemaVersion::V1_0_0, SchemaVersion::V2_0_0),
            Some(vec![
                SchemaVersion::V1_0_0,
                SchemaVersion::V1_1_0,
                SchemaVersion::V2_0_0
            ])
        );
        assert_eq!(graph.path(SchemaVersion::V2_0_0, SchemaVersion::V1_0_0), None);
    }

    #[test]
    fn same_version_is_noop() {
        let doc = empty_instance(SchemaVersion::V1_1_0);
        let upgrade = upgrade_document(&doc, SchemaVersion::V1_1_0).unwrap();
        assert!(upgrade.is_noop());
        assert_eq!(upgrade.message(), "Already at target version");
        assert_eq!(upgrade.document, doc);
    }

    #[test]
    fn downgrade_has_no_path() {
        let doc = empty_instance(SchemaVersion::V2_0_0);
        assert_eq!(
            upgrade_document(&doc, SchemaVersion::V1_0_0),
            Err(UpgradeError::NoUpgradePath {
                from: SchemaVersion::V2_0_0,
                to: SchemaVersion::V1_0_0,
            })
        );
    }

    #[test]
    fn missing_or_unknown_version() {
        assert_eq!(
            upgrade_document(&json!({"models": {}}), SchemaVersion::V2_0_0),
            Err(UpgradeError::MissingVersion)
        );
        assert!(matches!(
            upgrade_document(&json!({"version": "0.5"}), SchemaVersion::V2_0_0),
            Err(UpgradeError::Unsupported(_))
        ));
        assert_eq!(
            upgrade_document(&json!([]), SchemaVersion::V2_0_0),
            Err(UpgradeError::NotAnObject)
        );
    }

    #[test]
    fn first_step_adds_attributes() {
        let mut doc = empty_instance(SchemaVersion::V1_0_0);
        doc["models"]["basic_events"] = json!([{"id": "BE1", "probability": 0.1}]);

        let upgrade = upgrade_document(&doc, SchemaVersion::V1_1_0).unwrap();
        assert_eq!(upgrade.message(), "Upgraded from 1.0.0 to 1.1.0");
        assert_eq!(
            upgrade.document["models"]["basic_events"][0],
            json!({"id": "BE1", "probability": 0.1, "attributes": {}})
        );
        assert_eq!(upgrade.document["metadata"]["schema_version"], "1.1.0");
        assert_eq!(validate_document(&upgrade.document), Ok(()));
    }

    #[test]
    fn custom_graph_can_skip_versions() {
        let mut graph = UpgradeGraph::new();
        graph.add_step(SchemaVersion::V1_0_0, SchemaVersion::V2_0_0, upgrade_1_1_to_2_0);
        let doc = empty_instance(SchemaVersion::V1_0_0);
        let upgrade = graph.upgrade(&doc, SchemaVersion::V2_0_0).unwrap();
        assert_eq!(upgrade.path.len(), 2);
        assert_eq!(validate_document(&upgrade.document), Ok(()));
    }
}
