//! Sequence-Description parser
//!
//! `HTGR_PRA, <event_tree> =` headers switch the current event tree;
//! rows are `seq_id, description, [flag_set], [project]`.

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData, SequenceRow};
use crate::parsers::SaphireParser;
use crate::text::{content_lines, non_empty_field, split_fields, strip_leading_boms};

/// `.SQD` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct SqdParser;

impl SaphireParser for SqdParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Sqd
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_sqd(content)
    }
}

/// Parse Sequence-Description text
#[must_use]
pub fn parse_sqd(content: &str) -> Fragment {
    let mut sequences = Vec::new();
    let mut current_tree: Option<String> = None;

    for (_, line) in content_lines(strip_leading_boms(content)) {
        if let Some(rest) = line.strip_prefix("HTGR_PRA,") {
            let name = rest.split('=').next().unwrap_or_default().trim();
            current_tree = (!name.is_empty()).then(|| name.to_string());
            continue;
        }

        let fields = split_fields(line, ',');
        let Some(id) = non_empty_field(&fields, 0) else {
            continue;
        };
        let mut row = SequenceRow::new(id);
        row.event_tree.clone_from(&current_tree);
        row.description = non_empty_field(&fields, 1)
            .map_or_else(|| format!("Sequence {id}"), str::to_string);
        row.flag_set = non_empty_field(&fields, 2).map(str::to_string);
        row.project = non_empty_field(&fields, 3).map(str::to_string);
        sequences.push(row);
    }

    tracing::debug!("Found {} sequences in SQD file", sequences.len());
    Fragment::new(FragmentData::SequenceList { sequences })
}
