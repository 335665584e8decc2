//! Testing utilities for the SAPHIRE/OpenPRA workspace
//!
//! Sample exports, archive builders and document builders.

#![allow(missing_docs)]

use saphire_model::{
    BasicEvent, DocumentBuilder, EndState, EventSequence, EventTree, FaultTree, Gate, ProjectInfo,
    Reference, TopEvent, UnifiedDocument,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const BOM: &str = "\u{feff}";

/// Two well-formed trees separated by `^EOS`, no trailing delimiter
pub const TWO_TREE_ETL: &str = "HTGR_PRA, T1, IE-T1 =\n^TOPS\nA,B\n^SEQUENCES\n*\nY, S1, , OK\n^EOS\nHTGR_PRA, T2, IE-T2 =\n^TOPS\nC,D\n^SEQUENCES\n*\nY, S2, , FAIL";

pub const SAMPLE_FTL: &str = "HTGR_PRA, FT-ECCS =\n\
G-TOP OR G-PUMPS VALVE-A\n\
G-PUMPS AND PUMP-A PUMP-B\n\
^EOS\n";

pub const SAMPLE_BEI: &str = "PUMP-A, 1.0E-3, Pump A fails to start\n\
PUMP-B, 1.0E-3, Pump B fails to start\n\
VALVE-A, 5.0E-4, Valve A fails to open\n";

pub const SAMPLE_ESD: &str = "HTGR_PRA=\nOK, Safe shutdown\nCD, Core damage\n";

pub const SAMPLE_FAD: &str = "HTGR_PRA, Modular HTGR example model\nREVISION = 1\n";

pub const SAMPLE_STL: &str = "HTGR_PRA=\nSEQ-1, Successful trip, OK\nSEQ-2, Failed trip, CD\n";

/// One event tree block in the layout real exports use
#[must_use]
pub fn etl_tree(name: &str, tops: &[&str], sequences: &[(&str, &str)]) -> String {
    let mut out = format!("HTGR_PRA, {name}, IE-{name} =\n^TOPS\n{}\n^SEQUENCES\n*\n", tops.join(","));
    for (id, end_state) in sequences {
        out.push_str(&format!("Y, {id}, , {end_state}\n"));
    }
    out.push_str("^LOGIC\n");
    for (i, (id, _)) in sequences.iter().enumerate() {
        out.push_str(&format!("{id}, N{}\n", i + 1));
    }
    out
}

/// `count` trees joined as `^EOS\n<BOM>`, the way multi-tree HTGR exports look
#[must_use]
pub fn htgr_etl(count: usize) -> String {
    (1..=count)
        .map(|i| {
            etl_tree(
                &format!("TREE_{i}"),
                &["RPS", "ECCS", "RCCS"],
                &[("1", "OK"), ("2", "CD")],
            )
        })
        .collect::<Vec<_>>()
        .join(&format!("^EOS\n{BOM}"))
        + "^EOS\n"
}

/// Write a zip archive with the given `(name, bytes)` entries
///
/// Names ending in `/` become directory entries.
///
/// # Errors
/// Filesystem or archive failure.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options)?;
        } else {
            writer.start_file(*name, options)?;
            writer.write_all(bytes)?;
        }
    }
    writer.finish()?;
    Ok(())
}

/// Write files below `root`, creating parent directories
///
/// # Errors
/// Filesystem failure.
pub fn write_tree(root: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
    for (name, bytes) in entries {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
    }
    Ok(())
}

/// Entries of a small but complete export
#[must_use]
pub fn sample_export_entries() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("HTGR/HTGR.FAD", SAMPLE_FAD.as_bytes()),
        ("HTGR/_Subs/.FTL", SAMPLE_FTL.as_bytes()),
        ("HTGR/_Subs/.ETL", TWO_TREE_ETL.as_bytes()),
        ("HTGR/_Subs/.BEI", SAMPLE_BEI.as_bytes()),
        ("HTGR/_Subs/.ESD", SAMPLE_ESD.as_bytes()),
        ("HTGR/_Subs/.STL", SAMPLE_STL.as_bytes()),
        ("HTGR/notes.txt", b"free text"),
        ("__MACOSX/HTGR/._HTGR.FAD", b"resource fork"),
        ("HTGR/.DS_Store", b"finder"),
    ]
}

/// Temporary directory holding [`sample_export_entries`]
///
/// # Errors
/// Filesystem failure.
pub fn sample_export_dir() -> anyhow::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    write_tree(dir.path(), &sample_export_entries())?;
    Ok(dir)
}

/// Temporary directory plus a zip of [`sample_export_entries`] inside it
///
/// # Errors
/// Filesystem or archive failure.
pub fn sample_export_zip() -> anyhow::Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("export.zip");
    write_zip(&path, &sample_export_entries())?;
    Ok((dir, path))
}

/// Document with 1 fault tree, 1 event tree, 3 basic events, 1 end state
#[must_use]
pub fn sample_document() -> UnifiedDocument {
    let mut builder = DocumentBuilder::new();
    builder.merge_project(
        ProjectInfo::new("HTGR_PRA").with_description("Modular HTGR example model"),
    );

    let mut fault_tree = FaultTree::new("FT-ECCS");
    fault_tree.gates.push(
        Gate::new("G-TOP", "OR")
            .with_input(Reference::gate("G-PUMPS"))
            .with_input(Reference::basic_event("VALVE-A")),
    );
    fault_tree.gates.push(
        Gate::new("G-PUMPS", "AND")
            .with_input(Reference::basic_event("PUMP-A"))
            .with_input(Reference::basic_event("PUMP-B")),
    );
    for id in ["VALVE-A", "PUMP-A", "PUMP-B"] {
        fault_tree.note_basic_event(id);
    }
    builder.add_fault_tree(fault_tree);

    let mut event_tree = EventTree::new("LOSP").with_initiating_event("IE-LOSP");
    event_tree.top_events.push(TopEvent::new("ECCS"));
    let mut sequence = EventSequence::new("1", "CD");
    sequence.path.push("ECCS".to_string());
    event_tree.sequences.push(sequence);
    builder.add_event_tree(event_tree);

    for (id, p) in [("PUMP-A", 1.0e-3), ("PUMP-B", 1.0e-3), ("VALVE-A", 5.0e-4)] {
        builder.add_basic_event(BasicEvent::new(id, p));
    }
    builder.add_end_state(EndState::new("CD", "Core damage"));

    builder.finish()
}
