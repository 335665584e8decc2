//! End-to-end conversion: extraction output in, validated OpenPRA out

use openpra_convert::{ConversionInput, Converter, ConverterConfig};
use openpra_schema::{load_document, save_to_file, validate_document, SchemaVersion};
use pra_test_utils::{sample_document, sample_export_zip};
use pretty_assertions::assert_eq;
use saphire_extract::Extractor;
use saphire_model::{GateType, ReferenceKind};
use serde_json::json;

#[test]
fn sample_document_converts_to_valid_openpra() {
    let document = sample_document();
    let conversion = Converter::default().convert(&ConversionInput::from(&document));
    assert!(conversion.is_valid(), "{:?}", conversion.validation);

    let out = &conversion.document;
    assert_eq!(out.version, SchemaVersion::latest());
    assert_eq!(out.metadata.title, "PRA Model: HTGR_PRA");
    assert_eq!(out.metadata.description, "Modular HTGR example model");
    assert!(out.metadata.job_id.is_none());
    assert_eq!(out.models.fault_trees.len(), 1);
    assert_eq!(out.models.event_trees.len(), 1);
    assert_eq!(out.models.basic_events.len(), 3);
    assert_eq!(out.models.end_states.len(), 1);
    assert_eq!(out.models.initiating_events.len(), 1);
    assert_eq!(out.models.initiating_events[0].id, "IE-LOSP");

    let tree = &out.models.fault_trees[0];
    assert_eq!(tree.gates[0].gate_type, GateType::Or);
    assert_eq!(tree.gates[1].gate_type, GateType::And);
    assert_eq!(tree.gates[0].inputs[0].kind, ReferenceKind::Gate);
    assert_eq!(tree.gates[0].inputs[1].kind, ReferenceKind::BasicEvent);

    let path = &out.models.event_trees[0].sequences[0].path;
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].event, "Event1");
    assert!(!path[0].success);

    let value = conversion.to_value().unwrap();
    assert!(validate_document(&value).is_ok());
    assert!(value["lmp"].is_object());
}

#[test]
fn extraction_report_converts_as_job() {
    let (_dir, zip) = sample_export_zip().unwrap();
    let report = Extractor::default().extract(&zip, "job-7").unwrap();

    let conversion = Converter::default().convert(&ConversionInput::from(&report));
    assert!(conversion.is_valid());

    let out = &conversion.document;
    assert_eq!(out.metadata.job_id.as_deref(), Some("job-7"));
    assert_eq!(out.metadata.file_count, Some(7));
    assert_eq!(out.metadata.title, "PRA Model: HTGR_PRA");
    assert!(!out.metadata.description.is_empty());
    assert_eq!(out.metadata.attributes["REVISION"], "1");
    assert_eq!(out.models.fault_trees[0].id, "FT-ECCS");

    let ie: Vec<&str> = out
        .models
        .initiating_events
        .iter()
        .map(|ie| ie.id.as_str())
        .collect();
    assert_eq!(ie, vec!["IE-T1", "IE-T2"]);
    assert_eq!(out.models.end_states.len(), 3);
    assert_eq!(out.models.sequences.len(), 2);
}

#[test]
fn typed_and_serialized_reports_agree() {
    let (_dir, zip) = sample_export_zip().unwrap();
    let report = Extractor::default().extract(&zip, "job-8").unwrap();
    let converter = Converter::default();

    let typed = converter.convert(&ConversionInput::from(&report));
    let raw = converter
        .convert_value(&serde_json::to_value(&report).unwrap())
        .unwrap();

    assert_eq!(typed.document.models, raw.document.models);
    let mut typed_meta = typed.document.metadata.clone();
    typed_meta.created_date.clone_from(&raw.document.metadata.created_date);
    assert_eq!(typed_meta, raw.document.metadata);
}

#[test]
fn legacy_layout_converts_with_fallback_title() {
    let converter = Converter::new(ConverterConfig::new().with_source_label("Legacy"));
    let conversion = converter
        .convert_value(&json!({
            "files": {
                "M/.FTL": {"saphire": {"type": "fault_tree", "data": {
                    "id": "FT1",
                    "gates": [{"id": "G1", "type": "x", "inputs": ["BE1", "G2"]}]
                }}},
                "M/.BEI": {"saphire": {"type": "basic_event", "data": {
                    "id": "BE1", "name": "Valve", "probability": 0.01
                }}}
            }
        }))
        .unwrap();

    assert!(conversion.is_valid());
    let out = &conversion.document;
    assert_eq!(out.metadata.title, "Converted from SAPHIRE");
    assert_eq!(out.metadata.source, "Legacy");
    assert_eq!(out.models.fault_trees[0].gates[0].gate_type, GateType::Xor);
    assert_eq!(out.models.basic_events[0].name, "Valve");
}

#[test]
fn converted_document_survives_save_and_load() {
    let (dir, zip) = sample_export_zip().unwrap();
    let report = Extractor::default().extract(&zip, "job-9").unwrap();
    let conversion = Converter::default().convert(&ConversionInput::from(&report));

    let path = dir.path().join("out").join("openpra.json");
    save_to_file(&conversion.document, &path).unwrap();
    let loaded = load_document(&path, false).unwrap();
    assert_eq!(loaded.metadata, conversion.document.metadata);
    assert_eq!(loaded.models.fault_trees, conversion.document.models.fault_trees);
    assert_eq!(loaded.models.event_trees, conversion.document.models.event_trees);
    assert_eq!(loaded.models.basic_events.len(), 3);
}

#[test]
fn ill_typed_entries_degrade_instead_of_failing() {
    let conversion = Converter::default()
        .convert_value(&json!({
            "project": {"name": "HTGR"},
            "fault_trees": [],
            "event_trees": [],
            "basic_events": [
                {"id": "BE1", "name": "Pump", "probability": 0.001},
                {"id": "BE2", "probability": "1.0E-3"}
            ]
        }))
        .unwrap();

    let ids: Vec<&str> = conversion
        .document
        .models
        .basic_events
        .iter()
        .map(|be| be.id.as_str())
        .collect();
    assert_eq!(ids, vec!["BE1"]);
    assert_eq!(conversion.document.metadata.title, "PRA Model: HTGR");
    assert_eq!(conversion.skipped.len(), 1);
    assert_eq!(conversion.skipped[0].location, "basic_events[1]");

    let (valid, message) = conversion.verdict();
    assert!(!valid);
    assert!(message.contains("basic_events[1]"), "{message}");
}

#[test]
fn legacy_file_with_bad_gate_input_keeps_other_files() {
    let conversion = Converter::default()
        .convert_value(&json!({
            "files": {
                "a/.FTL": {"saphire": {"type": "fault_tree", "data": {
                    "id": "FT1",
                    "gates": [{"id": "G1", "type": "AND", "inputs": ["BE1", 7]}]
                }}},
                "b/.BEI": {"saphire": {"type": "basic_event", "data": {
                    "id": "BE1", "probability": 0.5
                }}}
            }
        }))
        .unwrap();

    assert!(conversion.document.models.fault_trees.is_empty());
    assert_eq!(conversion.document.models.basic_events[0].id, "BE1");
    assert_eq!(conversion.skipped[0].location, "a/.FTL");
    assert!(!conversion.is_valid());
}

#[test]
fn non_object_input_is_rejected() {
    assert!(Converter::default().convert_value(&json!("text")).is_err());
}
