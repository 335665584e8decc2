//! Sequence-List parser: optional `HTGR_PRA=` header, then
//! `id, description, end_state` rows

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData, SequenceRow};
use crate::parsers::esd::LIST_HEADER_MARKER;
use crate::parsers::SaphireParser;
use crate::text::{content_lines, split_fields, strip_leading_boms};

/// `.STL` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct StlParser;

impl SaphireParser for StlParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Stl
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_stl(content)
    }
}

/// Parse Sequence-List text
#[must_use]
pub fn parse_stl(content: &str) -> Fragment {
    let sequences: Vec<SequenceRow> = content_lines(strip_leading_boms(content))
        .enumerate()
        .filter(|(i, (_, line))| !(*i == 0 && line.contains(LIST_HEADER_MARKER)))
        .filter_map(|(_, (_, line))| {
            let fields = split_fields(line, ',');
            let id = fields.first().copied().filter(|id| !id.is_empty())?;
            let mut row = SequenceRow::new(id);
            row.description = fields.get(1).copied().unwrap_or_default().to_string();
            row.end_state = Some(fields.get(2).copied().unwrap_or_default().to_string());
            Some(row)
        })
        .collect();

    tracing::debug!("Found {} sequences in STL file", sequences.len());
    Fragment::new(FragmentData::SequenceList { sequences })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_with_end_states() {
        let fragment = parse_stl("HTGR_PRA=\nSEQ1, Trip succeeds, OK\nSEQ2, Trip fails\n");
        let FragmentData::SequenceList { sequences } = &fragment.data else {
            panic!("unexpected fragment {:?}", fragment.data);
        };
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].end_state.as_deref(), Some("OK"));
        assert_eq!(sequences[1].end_state.as_deref(), Some(""));
        assert_eq!(sequences[1].description, "Trip fails");
    }

    #[test]
    fn header_only_skipped_on_first_line() {
        let fragment = parse_stl("SEQ1, a, OK\nHTGR_PRA=, b, CD\n");
        let FragmentData::SequenceList { sequences } = &fragment.data else {
            panic!("unexpected fragment {:?}", fragment.data);
        };
        assert_eq!(sequences.len(), 2);
    }
}
