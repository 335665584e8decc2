//! Project-Description parser
//!
//! First line: `name, description, ...`. Later `key = value` lines become
//! project attributes.

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData};
use crate::parsers::SaphireParser;
use crate::text::{content_lines, line_error, split_fields, strip_leading_boms};
use saphire_model::ProjectInfo;

/// `.FAD` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct FadParser;

impl SaphireParser for FadParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Fad
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_fad(content)
    }
}

/// Parse Project-Description text
#[must_use]
pub fn parse_fad(content: &str) -> Fragment {
    let mut project = ProjectInfo::default();
    let mut errors = Vec::new();
    let mut lines = content_lines(strip_leading_boms(content));

    if let Some((line_no, first)) = lines.next() {
        let fields = split_fields(first, ',');
        if fields.len() >= 2 {
            project.name = fields[0].to_string();
            project.description = fields[1].to_string();
        } else {
            errors.push(line_error(
                line_no,
                format!("expected 'name, description', got '{first}'"),
            ));
        }
    }

    for (_, line) in lines {
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                project
                    .attributes
                    .insert(key.to_string(), value.trim().to_string());
            }
        }
    }

    tracing::debug!("Found project info in FAD: {}", project.name);
    Fragment::new(FragmentData::ProjectDescription(project)).with_errors(errors)
}
