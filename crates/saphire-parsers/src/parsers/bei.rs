//! Basic-Event-Information parser
//!
//! Rows are `id, probability, [name], [type]`. An empty probability reads
//! as 0.0; a non-numeric one is an error for that row only.

use crate::classify::LegacyFormat;
use crate::fragment::{BasicEventRow, Fragment, FragmentData};
use crate::parsers::SaphireParser;
use crate::text::{content_lines, line_error, non_empty_field, split_fields, strip_leading_boms};

/// `.BEI` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct BeiParser;

impl SaphireParser for BeiParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Bei
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_bei(content)
    }
}

/// Parse Basic-Event-Information text
#[must_use]
pub fn parse_bei(content: &str) -> Fragment {
    let mut basic_events = Vec::new();
    let mut errors = Vec::new();

    for (line_no, line) in content_lines(strip_leading_boms(content)) {
        match parse_row(line) {
            Ok(row) => basic_events.push(row),
            Err(message) => errors.push(line_error(line_no, message)),
        }
    }

    tracing::debug!(
        "Parsed {} basic events ({} line errors)",
        basic_events.len(),
        errors.len()
    );
    Fragment::new(FragmentData::BasicEventInfo { basic_events }).with_errors(errors)
}

fn parse_row(line: &str) -> Result<BasicEventRow, String> {
    let fields = split_fields(line, ',');
    if fields.len() < 2 {
        return Err(format!("expected 'id, probability', got '{line}'"));
    }
    let id = fields[0];
    if id.is_empty() {
        return Err("empty basic event id".to_string());
    }

    let probability = match fields[1] {
        "" => 0.0,
        raw => raw
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| format!("invalid probability '{raw}' for {id}"))?,
    };

    Ok(BasicEventRow {
        id: id.to_string(),
        probability,
        name: non_empty_field(&fields, 2).map(str::to_string),
        event_type: non_empty_field(&fields, 3).map(str::to_string),
    })
}
