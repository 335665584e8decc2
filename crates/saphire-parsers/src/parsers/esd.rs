//! End-State-Description parser
//!
//! An optional first line containing `HTGR_PRA=` is a header. Rows are
//! `id, description`.

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData};
use crate::parsers::SaphireParser;
use crate::text::{content_lines, split_fields, strip_leading_boms};
use saphire_model::EndState;

/// Marker of the optional header line in list files
pub(crate) const LIST_HEADER_MARKER: &str = "HTGR_PRA=";

/// `.ESD` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct EsdParser;

impl SaphireParser for EsdParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Esd
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_esd(content)
    }
}

/// Parse End-State-Description text
#[must_use]
pub fn parse_esd(content: &str) -> Fragment {
    let end_states: Vec<EndState> = content_lines(strip_leading_boms(content))
        .enumerate()
        .filter(|(i, (_, line))| !(*i == 0 && line.contains(LIST_HEADER_MARKER)))
        .filter_map(|(_, (_, line))| {
            let fields = split_fields(line, ',');
            let id = fields.first().copied().filter(|id| !id.is_empty())?;
            let description = fields.get(1).copied().unwrap_or_default();
            Some(EndState::new(id, description))
        })
        .collect();

    tracing::debug!("Found {} end states in ESD file", end_states.len());
    Fragment::new(FragmentData::EndStateDescription { end_states })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_reads_rows() {
        let fragment = parse_esd("\u{feff}HTGR_PRA=\nOK, Safe shutdown\nCD, Core damage\n, orphan\nLONE\n");
        let FragmentData::EndStateDescription { end_states } = &fragment.data else {
            panic!("unexpected fragment {:?}", fragment.data);
        };
        let ids: Vec<&str> = end_states.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["OK", "CD", "LONE"]);
        assert_eq!(end_states[1].description, "Core damage");
        assert_eq!(end_states[2].description, "");
        assert_eq!(end_states[0].name, "OK");
    }
}
