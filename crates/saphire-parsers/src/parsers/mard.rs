//! Master-Reference parser: content is kept as is

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData};
use crate::parsers::SaphireParser;
use crate::text::strip_leading_boms;

/// Fixed description attached to every MARD fragment
pub const MARD_DESCRIPTION: &str = "MARD file is a reference to PRA data";

/// `.MARD` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct MardParser;

impl SaphireParser for MardParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Mard
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_mard(content)
    }
}

/// Wrap Master-Reference text
#[must_use]
pub fn parse_mard(content: &str) -> Fragment {
    Fragment::new(FragmentData::MardFile {
        raw_content: strip_leading_boms(content).to_string(),
        description: MARD_DESCRIPTION.to_string(),
    })
}
