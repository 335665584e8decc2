//! JSON passthrough parser

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData};
use crate::parsers::SaphireParser;
use crate::text::strip_leading_boms;
use serde_json::Value;

/// `.json` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl SaphireParser for JsonParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Json
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_json(content)
    }
}

/// Parse JSON text; invalid input yields an empty object and one error
#[must_use]
pub fn parse_json(content: &str) -> Fragment {
    match serde_json::from_str::<Value>(strip_leading_boms(content)) {
        Ok(value) => Fragment::new(FragmentData::Json(value)),
        Err(e) => Fragment::new(FragmentData::Json(Value::Object(serde_json::Map::new())))
            .with_errors(vec![format!("invalid JSON: {e}")]),
    }
}
