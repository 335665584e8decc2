//! Sequence-Logic parser
//!
//! Blocks are split on `^EOS`. A block header reads
//! `HTGR_PRA, <event_tree>, <seq_id>=`; the remaining lines, joined with
//! spaces, are the sequence logic. When the logic carries a `.`
//! terminator, its last term names the end state.

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData, SequenceRow};
use crate::parsers::SaphireParser;
use crate::text::{clean_line, content_lines, split_fields, strip_leading_boms};

/// `.SQL` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParser;

impl SaphireParser for SqlParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Sql
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_sql(content)
    }
}

/// Parse Sequence-Logic text
#[must_use]
pub fn parse_sql(content: &str) -> Fragment {
    let mut sequences = Vec::new();
    let mut errors = Vec::new();

    for (block_idx, block) in strip_leading_boms(content).split("^EOS").enumerate() {
        let mut lines = content_lines(block);
        let Some((_, header)) = lines.next() else {
            continue;
        };
        if !header.starts_with("HTGR_PRA") {
            continue;
        }

        let fields = split_fields(header, ',');
        if fields.len() < 3 {
            errors.push(format!(
                "block {block_idx}: header needs event tree and sequence id: '{header}'"
            ));
            continue;
        }
        let seq_id = fields[2].split('=').next().map(clean_line).unwrap_or_default();
        if seq_id.is_empty() {
            errors.push(format!("block {block_idx}: empty sequence id"));
            continue;
        }

        let logic = lines.map(|(_, line)| line).collect::<Vec<_>>().join(" ");
        let mut row = SequenceRow::new(seq_id);
        row.event_tree = Some(fields[1].to_string());
        row.end_state = end_state_from_logic(&logic);
        row.logic = Some(logic);
        sequences.push(row);
    }

    tracing::debug!("Found {} sequences in SQL file", sequences.len());
    Fragment::new(FragmentData::SequenceList { sequences }).with_errors(errors)
}

/// Last term before the `.` terminator, with `/` negation stripped
fn end_state_from_logic(logic: &str) -> Option<String> {
    if !logic.contains('.') {
        return None;
    }
    logic
        .split_whitespace()
        .rev()
        .find(|term| *term != ".")
        .map(|term| term.trim_matches('/'))
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}
