//! Fault-Tree-Logic parser
//!
//! Two states: outside a tree, or inside tree `T` after a
//! `HTGR_PRA, T = ...` header. `^EOS` leaves the tree. Inside, each line
//! is `gate_id gate_type [inputs...]`.
//!
//! Inputs are resolved once the whole file is read: an id naming a gate
//! of the same tree is a gate reference, any other id falls back to the
//! `G` prefix convention.

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData};
use crate::parsers::SaphireParser;
use crate::text::{content_lines, line_error, strip_leading_boms};
use indexmap::{IndexMap, IndexSet};
use saphire_model::{FaultTree, Gate, Reference, ReferenceKind};

const HEADER_PREFIX: &str = "HTGR_PRA,";
const END_OF_SECTION: &str = "^EOS";

/// `.FTL` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct FtlParser;

impl SaphireParser for FtlParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Ftl
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_ftl(content)
    }
}

/// Gate line before input resolution
struct RawGate {
    id: String,
    gate_type: String,
    inputs: Vec<String>,
}

/// Parse Fault-Tree-Logic text
#[must_use]
pub fn parse_ftl(content: &str) -> Fragment {
    let mut raw_trees: IndexMap<String, Vec<RawGate>> = IndexMap::new();
    let mut current: Option<String> = None;
    let mut errors = Vec::new();

    for (line_no, line) in content_lines(strip_leading_boms(content)) {
        if let Some(rest) = line.strip_prefix(HEADER_PREFIX) {
            let name = rest.split('=').next().unwrap_or_default().trim();
            if name.is_empty() {
                errors.push(line_error(line_no, "fault tree header without a name"));
                current = None;
                continue;
            }
            raw_trees.entry(name.to_string()).or_default();
            current = Some(name.to_string());
        } else if line == END_OF_SECTION {
            current = None;
        } else if let Some(tree) = current.as_ref() {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(id), Some(gate_type)) => {
                    if let Some(gates) = raw_trees.get_mut(tree) {
                        gates.push(RawGate {
                            id: id.to_string(),
                            gate_type: gate_type.to_uppercase(),
                            inputs: tokens.map(str::to_string).collect(),
                        });
                    }
                }
                _ => errors.push(line_error(
                    line_no,
                    format!("gate definition needs an id and a type: '{line}'"),
                )),
            }
        }
    }

    let fault_trees: IndexMap<String, FaultTree> = raw_trees
        .into_iter()
        .map(|(name, gates)| {
            let tree = resolve_tree(&name, gates);
            (name, tree)
        })
        .collect();

    tracing::debug!(
        "Parsed {} fault trees ({} line errors)",
        fault_trees.len(),
        errors.len()
    );
    Fragment::new(FragmentData::FaultTreeLogic { fault_trees }).with_errors(errors)
}

fn resolve_tree(name: &str, raw_gates: Vec<RawGate>) -> FaultTree {
    let gate_ids: IndexSet<String> = raw_gates.iter().map(|g| g.id.clone()).collect();
    let mut tree = FaultTree::new(name);

    for raw in raw_gates {
        let mut gate = Gate::new(raw.id, raw.gate_type);
        for input in raw.inputs {
            let kind = if gate_ids.contains(&input) {
                ReferenceKind::Gate
            } else {
                ReferenceKind::from_prefix(&input)
            };
            if kind == ReferenceKind::BasicEvent {
                tree.note_basic_event(&input);
            }
            gate.inputs.push(Reference { id: input, kind });
        }
        tree.gates.push(gate);
    }
    tree
}
