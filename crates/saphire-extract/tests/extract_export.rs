use pra_test_utils::{htgr_etl, sample_export_dir, sample_export_zip, write_zip};
use pretty_assertions::assert_eq;
use saphire_extract::{DocumentStore, ExtractConfig, Extractor, MemoryStore};
use saphire_model::validate_document;
use saphire_parsers::FileCategory;

fn ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

#[test]
fn sample_zip_aggregates_every_fragment() {
    let (_dir, zip) = sample_export_zip().unwrap();
    let report = Extractor::default().extract(&zip, "job-1").unwrap();
    let doc = &report.document;

    assert_eq!(report.job_id, "job-1");
    assert_eq!(report.metadata.total_files, 7);
    assert!(report.is_clean(), "{:?}", report.metadata);

    assert_eq!(doc.project.name, "HTGR_PRA");
    assert_eq!(doc.project.description, "Modular HTGR example model");
    assert_eq!(doc.project.attributes.get("REVISION").map(String::as_str), Some("1"));

    assert_eq!(ids(&doc.fault_trees, |t| &t.id), vec!["FT-ECCS"]);
    assert_eq!(
        doc.fault_trees[0].basic_events,
        vec!["VALVE-A", "PUMP-A", "PUMP-B"]
    );
    assert_eq!(ids(&doc.event_trees, |t| &t.id), vec!["T1", "T2"]);
    assert_eq!(doc.event_trees[1].initiating_event, "IE-T2");
    assert_eq!(ids(&doc.basic_events, |e| &e.id), vec!["PUMP-A", "PUMP-B", "VALVE-A"]);
    assert_eq!(ids(&doc.end_states, |e| &e.id), vec!["OK", "CD", "FAIL"]);
    assert_eq!(doc.end_states[0].description, "Safe shutdown");
    assert_eq!(doc.end_states[2].description, "End state FAIL");
    assert_eq!(ids(&doc.sequences, |s| &s.id), vec!["SEQ-1", "SEQ-2"]);

    let doc_value = serde_json::to_value(doc).unwrap();
    assert_eq!(validate_document(&doc_value), Ok(()));
}

#[test]
fn records_cover_every_visited_file() {
    let dir = sample_export_dir().unwrap();
    let report = Extractor::default().analyze(dir.path(), "job-2").unwrap();

    let paths: Vec<&str> = report.files.keys().map(String::as_str).collect();
    assert!(!paths.iter().any(|p| p.contains("__MACOSX") || p.ends_with(".DS_Store")));

    let etl = &report.files["HTGR/_Subs/.ETL"];
    assert_eq!(etl.category, FileCategory::EventTree);
    assert_eq!(etl.fragment.as_deref(), Some("event_tree_logic"));
    assert_eq!(etl.checksum.as_ref().map(String::len), Some(64));

    let notes = &report.files["HTGR/notes.txt"];
    assert_eq!(notes.category, FileCategory::Text);
    assert!(!notes.was_parsed());
    assert_eq!(report.files_in(FileCategory::Project).count(), 1);
}

#[test]
fn directory_and_zip_give_the_same_document() {
    let dir = sample_export_dir().unwrap();
    let (_zip_dir, zip) = sample_export_zip().unwrap();
    let extractor = Extractor::default();

    let from_dir = extractor.analyze(dir.path(), "job").unwrap();
    let from_zip = extractor.extract(&zip, "job").unwrap();
    assert_eq!(from_dir, from_zip);
}

#[test]
fn empty_files_produce_an_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let zip = dir.path().join("empty.zip");
    let entries: Vec<(&str, &[u8])> = [".FAD", ".FTL", ".ETL", ".BEI", ".ESD", ".STL"]
        .iter()
        .map(|name| (*name, &b""[..]))
        .collect();
    write_zip(&zip, &entries).unwrap();

    let report = Extractor::default().extract(&zip, "empty").unwrap();
    assert_eq!(report.metadata.total_files, 6);
    assert_eq!(report.metadata.errors, 0);
    assert!(report.document.is_empty());
    assert_eq!(report.files[".ETL"].parse_errors.len(), 1);
}

#[test]
fn multi_tree_etl_with_bom_separators() {
    let dir = tempfile::tempdir().unwrap();
    pra_test_utils::write_tree(dir.path(), &[("P/.ETL", htgr_etl(8).as_bytes())]).unwrap();

    let report = Extractor::default().analyze(dir.path(), "htgr").unwrap();
    assert_eq!(report.summary().event_trees, 8);
    assert_eq!(ids(&report.document.end_states, |e| &e.id), vec!["OK", "CD"]);
}

#[test]
fn reports_round_trip_through_the_store() {
    let (_dir, zip) = sample_export_zip().unwrap();
    let report = Extractor::new(ExtractConfig::default())
        .extract(&zip, "job-9")
        .unwrap();

    let store = MemoryStore::new();
    store.put_document(&report.job_id, report.clone()).unwrap();
    assert_eq!(store.get_document("job-9").unwrap(), Some(report));
    assert_eq!(store.job_ids().unwrap(), vec!["job-9"]);
}
