//! Event-Tree-Logic parser
//!
//! Real exports put several trees in one file, separated by `^EOS` with
//! stray BOMs sprinkled between them. Parsing works in two layers:
//!
//! 1. The content is split on `^EOS`. Every block that is not blank is a
//!    candidate tree; a block whose first line is not a tree header is
//!    noise and skipped silently.
//! 2. Inside a block an explicit state machine ([`EtlState`]) walks the
//!    lines. `^`-markers switch sections; a [`TreeContext`] holds the
//!    tree under construction and per-section bookkeeping.
//!
//! A header met in the middle of a block (a missing `^EOS`) closes the
//! current tree, starts a new one and records a warning.
//!
//! # Sections
//!
//! | Marker | Content |
//! |---|---|
//! | `^TOPS` | next line: comma list of top events |
//! | `^SEQUENCES` | one header line, then `Y, seq_id, _, end_state` rows |
//! | `^LOGIC` | `seq_id, node_id` rows appended to the sequence path |
//! | `^NODESUBS` | `NODEPOS n` then `original=substitute` |
//! | `^TEXT` | `NODEPOS n` then a quoted description |

use crate::classify::LegacyFormat;
use crate::fragment::{Fragment, FragmentData};
use crate::parsers::SaphireParser;
use crate::text::{clean_line, is_blank, split_fields, strip_boms_and_whitespace, strip_leading_boms};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use saphire_model::{EventSequence, EventTree, NodeSubstitution, TopEvent};

/// Block delimiter
pub const END_OF_SECTION: &str = "^EOS";

/// `HTGR_PRA, <tree>[, <ie>] [= ...]`, tolerant of missing parts and spacing
static HEADER: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^HTGR_PRA\s*,\s*([^,=]+?)\s*(?:,\s*([^=]*?)\s*)?(?:=.*)?$").ok()
});

/// `.ETL` parser
#[derive(Debug, Clone, Copy, Default)]
pub struct EtlParser;

impl SaphireParser for EtlParser {
    fn format(&self) -> LegacyFormat {
        LegacyFormat::Etl
    }

    fn parse(&self, content: &str) -> Fragment {
        parse_etl(content)
    }
}

/// Parser state within a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtlState {
    /// Before a header, or after the block ended
    Outside,
    /// Inside a tree, no section active
    InTree,
    /// Reading the top-event list
    InTops,
    /// Reading sequence rows
    InSequences,
    /// Reading logic rows
    InLogic,
    /// Reading node substitutions
    InNodeSubs,
    /// Reading node descriptions
    InText,
}

const IN_TREE_TARGETS: [EtlState; 7] = [
    EtlState::InTree,
    EtlState::InTops,
    EtlState::InSequences,
    EtlState::InLogic,
    EtlState::InNodeSubs,
    EtlState::InText,
    EtlState::Outside,
];

/// States reachable from `from`
///
/// A tree is entered only through a header. Once inside, any section
/// marker, a new header (`InTree`) or the end of the block (`Outside`)
/// may follow.
#[must_use]
pub fn allowed_transitions(from: EtlState) -> &'static [EtlState] {
    match from {
        EtlState::Outside => &[EtlState::InTree],
        EtlState::InTree
        | EtlState::InTops
        | EtlState::InSequences
        | EtlState::InLogic
        | EtlState::InNodeSubs
        | EtlState::InText => &IN_TREE_TARGETS,
    }
}

/// Transition not present in [`allowed_transitions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal event-tree parser transition: {from:?} -> {to:?}")]
pub struct IllegalTransition {
    /// Current state
    pub from: EtlState,
    /// Requested state
    pub to: EtlState,
}

/// Validates a state transition
///
/// # Errors
/// `to` is not reachable from `from`.
pub fn validate_transition(from: EtlState, to: EtlState) -> Result<(), IllegalTransition> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

/// Section marker lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Tops,
    Sequences,
    Logic,
    NodeSubs,
    Text,
}

impl Marker {
    fn parse(line: &str) -> Option<Self> {
        match line {
            "^TOPS" => Some(Marker::Tops),
            "^LOGIC" => Some(Marker::Logic),
            "^NODESUBS" => Some(Marker::NodeSubs),
            "^TEXT" => Some(Marker::Text),
            _ if line.starts_with("^SEQUENCES") => Some(Marker::Sequences),
            _ => None,
        }
    }

    fn state(self) -> EtlState {
        match self {
            Marker::Tops => EtlState::InTops,
            Marker::Sequences => EtlState::InSequences,
            Marker::Logic => EtlState::InLogic,
            Marker::NodeSubs => EtlState::InNodeSubs,
            Marker::Text => EtlState::InText,
        }
    }
}

/// Parsed tree header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeHeader {
    /// Tree name, the document key
    pub name: String,
    /// Initiating event, empty when absent
    pub initiating_event: String,
}

/// Parse a tree header line
#[must_use]
pub fn parse_header(line: &str) -> Option<TreeHeader> {
    let captures = HEADER.as_ref()?.captures(line)?;
    let name = captures.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    let initiating_event = captures
        .get(2)
        .and_then(|m| m.as_str().split(',').next())
        .map(str::trim)
        .unwrap_or_default();
    Some(TreeHeader {
        name: name.to_string(),
        initiating_event: initiating_event.to_string(),
    })
}

/// Tree under construction plus section bookkeeping
#[derive(Debug)]
pub struct TreeContext {
    tree: EventTree,
    /// `^TOPS` list already consumed for the current section
    tops_read: bool,
    /// `^SEQUENCES` header line still to skip
    sequence_header_pending: bool,
    /// Node position announced by `NODEPOS`, awaiting its payload line
    pending_node: Option<String>,
}

impl TreeContext {
    fn new(header: TreeHeader) -> Self {
        Self {
            tree: EventTree::new(header.name).with_initiating_event(header.initiating_event),
            tops_read: false,
            sequence_header_pending: false,
            pending_node: None,
        }
    }

    /// Name of the tree being built
    #[must_use]
    pub fn name(&self) -> &str {
        &self.tree.id
    }

    fn enter(&mut self, state: EtlState) {
        self.pending_node = None;
        match state {
            EtlState::InTops => self.tops_read = false,
            EtlState::InSequences => self.sequence_header_pending = true,
            _ => {}
        }
    }
}

/// Multi-block parse state
struct EtlParse {
    trees: IndexMap<String, EventTree>,
    errors: Vec<String>,
    state: EtlState,
    context: Option<TreeContext>,
}

impl EtlParse {
    fn new() -> Self {
        Self {
            trees: IndexMap::new(),
            errors: Vec::new(),
            state: EtlState::Outside,
            context: None,
        }
    }

    fn transition(&mut self, to: EtlState) {
        if let Err(err) = validate_transition(self.state, to) {
            tracing::error!("{}", err);
            self.errors.push(err.to_string());
            return;
        }
        if let Some(ctx) = self.context.as_mut() {
            ctx.enter(to);
        }
        self.state = to;
    }

    fn open_tree(&mut self, header: TreeHeader) {
        tracing::debug!("Found event tree: {}", header.name);
        self.context = Some(TreeContext::new(header));
        self.state = EtlState::Outside;
        self.transition(EtlState::InTree);
    }

    fn close_tree(&mut self) {
        if let Some(ctx) = self.context.take() {
            let tree = ctx.tree;
            match self.trees.get_mut(&tree.id) {
                Some(existing) => merge_tree(existing, tree),
                None => {
                    self.trees.insert(tree.id.clone(), tree);
                }
            }
        }
        if self.state != EtlState::Outside {
            self.transition(EtlState::Outside);
        }
    }

    /// The raw line right after `^SEQUENCES` is a column header, even when blank
    fn take_sequence_header(&mut self) -> bool {
        if self.state != EtlState::InSequences {
            return false;
        }
        self.context
            .as_mut()
            .is_some_and(|ctx| std::mem::take(&mut ctx.sequence_header_pending))
    }

    fn block_error(&mut self, block: usize, line: usize, message: impl std::fmt::Display) {
        self.errors
            .push(format!("block {block}, line {line}: {message}"));
    }

    fn parse_block(&mut self, block_idx: usize, block: &str) {
        let block = strip_boms_and_whitespace(block);

        for (offset, raw) in block.lines().enumerate() {
            let line_no = offset + 1;
            let line = clean_line(raw);
            if self.take_sequence_header() {
                continue;
            }
            if line.is_empty() {
                continue;
            }

            if self.state == EtlState::Outside {
                match parse_header(line) {
                    Some(header) => {
                        self.open_tree(header);
                        continue;
                    }
                    None => {
                        tracing::debug!("Block {} does not start with a tree header, skipping", block_idx);
                        return;
                    }
                }
            }

            if let Some(header) = parse_header(line) {
                let previous = self
                    .context
                    .as_ref()
                    .map(|c| c.name().to_string())
                    .unwrap_or_default();
                tracing::warn!(
                    "Tree header '{}' found before {} closed '{}'",
                    header.name,
                    END_OF_SECTION,
                    previous
                );
                self.block_error(
                    block_idx,
                    line_no,
                    format!(
                        "tree '{}' starts before {END_OF_SECTION} closed '{previous}'",
                        header.name
                    ),
                );
                self.close_tree();
                self.open_tree(header);
                continue;
            }

            if let Some(marker) = Marker::parse(line) {
                self.transition(marker.state());
                continue;
            }
            if line.starts_with('^') {
                tracing::debug!("Ignoring unknown section marker '{}'", line);
                self.transition(EtlState::InTree);
                continue;
            }

            if let Err(message) = self.section_line(line) {
                self.block_error(block_idx, line_no, message);
            }
        }

        self.close_tree();
    }

    fn section_line(&mut self, line: &str) -> Result<(), String> {
        let state = self.state;
        let Some(ctx) = self.context.as_mut() else {
            return Ok(());
        };

        match state {
            EtlState::Outside | EtlState::InTree => Ok(()),
            EtlState::InTops => {
                if ctx.tops_read {
                    return Ok(());
                }
                ctx.tops_read = true;
                ctx.tree.top_events.extend(
                    split_fields(line, ',')
                        .into_iter()
                        .filter(|id| !id.is_empty())
                        .map(|id| TopEvent {
                            id: id.to_string(),
                            description: id.to_string(),
                        }),
                );
                Ok(())
            }
            EtlState::InSequences => {
                let fields = split_fields(line, ',');
                if fields.len() < 4 {
                    return Err(format!("malformed sequence row '{line}'"));
                }
                if fields[0] != "Y" || fields[1].is_empty() {
                    return Ok(());
                }
                ctx.tree
                    .sequences
                    .push(EventSequence::new(fields[1], fields[3]));
                Ok(())
            }
            EtlState::InLogic => {
                let fields = split_fields(line, ',');
                if fields.len() < 2 {
                    return Err(format!("malformed logic row '{line}'"));
                }
                match ctx.tree.sequence_mut(fields[0]) {
                    Some(sequence) => {
                        sequence.path.push(fields[1].to_string());
                        Ok(())
                    }
                    None => Err(format!("logic row for unknown sequence '{}'", fields[0])),
                }
            }
            EtlState::InNodeSubs => {
                if let Some(node) = node_position(line) {
                    ctx.pending_node = Some(node);
                    return Ok(());
                }
                let node = ctx
                    .pending_node
                    .take()
                    .ok_or_else(|| format!("substitution without NODEPOS: '{line}'"))?;
                match line.split_once('=') {
                    Some((original, substitute)) if !substitute.contains('=') => {
                        ctx.tree.node_substitutions.insert(
                            node,
                            NodeSubstitution {
                                original: original.trim().to_string(),
                                substitute: substitute.trim().to_string(),
                            },
                        );
                        Ok(())
                    }
                    _ => Err(format!("malformed substitution for node {node}: '{line}'")),
                }
            }
            EtlState::InText => {
                if let Some(node) = node_position(line) {
                    ctx.pending_node = Some(node);
                    return Ok(());
                }
                let node = ctx
                    .pending_node
                    .take()
                    .ok_or_else(|| format!("text without NODEPOS: '{line}'"))?;
                ctx.tree
                    .node_descriptions
                    .insert(node, line.trim_matches('"').to_string());
                Ok(())
            }
        }
    }

    fn finish(mut self, non_empty_blocks: usize) -> Fragment {
        if non_empty_blocks == 0 {
            self.errors.push("no event tree data found".to_string());
        } else if self.trees.len() < non_empty_blocks {
            let names: Vec<&str> = self.trees.keys().map(String::as_str).collect();
            let warning = format!(
                "expected {} trees, found {}: {}",
                non_empty_blocks,
                names.len(),
                names.join(", ")
            );
            tracing::warn!("{}", warning);
            self.errors.push(warning);
        }

        tracing::info!(
            "ETL parsing complete - found {} event trees",
            self.trees.len()
        );
        Fragment::new(FragmentData::EventTreeLogic {
            event_trees: self.trees,
        })
        .with_errors(self.errors)
    }
}

fn node_position(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some("NODEPOS"), Some(node)) => Some(node.to_string()),
        _ => None,
    }
}

/// Fold a repeated tree into the first occurrence
fn merge_tree(existing: &mut EventTree, other: EventTree) {
    if existing.initiating_event.is_empty() {
        existing.initiating_event = other.initiating_event;
    }
    existing.top_events.extend(other.top_events);
    existing.sequences.extend(other.sequences);
    existing.node_descriptions.extend(other.node_descriptions);
    existing.node_substitutions.extend(other.node_substitutions);
}

/// Parse Event-Tree-Logic text
///
/// Empty input yields zero trees and one error. Output is deterministic:
/// trees keep file order, errors keep discovery order.
#[must_use]
pub fn parse_etl(content: &str) -> Fragment {
    let content = strip_leading_boms(content);
    let mut parse = EtlParse::new();
    let mut non_empty_blocks = 0;

    for (block_idx, block) in content.split(END_OF_SECTION).enumerate() {
        if is_blank(block) {
            continue;
        }
        non_empty_blocks += 1;
        parse.parse_block(block_idx, block);
    }

    parse.finish(non_empty_blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_TREES: &str = "HTGR_PRA, T1, IE-T1 =\n^TOPS\nA,B\n^SEQUENCES\n*\nY, S1, , OK\n^EOS\nHTGR_PRA, T2, IE-T2 =\n^TOPS\nC,D\n^SEQUENCES\n*\nY, S2, , FAIL";

    fn trees(fragment: &Fragment) -> &IndexMap<String, EventTree> {
        fragment.event_trees().unwrap()
    }

    #[test]
    fn minimal_two_tree_scenario() {
        let fragment = parse_etl(TWO_TREES);
        let trees = trees(&fragment);

        assert_eq!(trees.keys().collect::<Vec<_>>(), vec!["T1", "T2"]);
        for (name, end_state) in [("T1", "OK"), ("T2", "FAIL")] {
            let tree = &trees[name];
            assert_eq!(tree.top_events.len(), 2);
            assert_eq!(tree.sequences.len(), 1);
            assert_eq!(tree.sequences[0].end_state, end_state);
        }
        assert_eq!(trees["T1"].initiating_event, "IE-T1");
        assert!(fragment.is_clean(), "{:?}", fragment.errors);
    }

    #[test]
    fn sequence_header_is_the_next_raw_line() {
        let blank_header = "HTGR_PRA, T1, IE =\n^TOPS\nA\n^SEQUENCES\n\nY, S1, , OK\nY, S2, , CD\n";
        let fragment = parse_etl(blank_header);
        let ids: Vec<&str> = trees(&fragment)["T1"]
            .sequences
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["S1", "S2"]);

        let no_header = "HTGR_PRA, T1, IE =\n^SEQUENCES\nY, S1, , OK\nY, S2, , CD\n";
        let fragment = parse_etl(no_header);
        assert_eq!(trees(&fragment)["T1"].sequences[0].id, "S2");
    }

    #[test]
    fn empty_input_is_an_error_not_a_panic() {
        for input in ["", "\u{feff}", "  \n\n"] {
            let fragment = parse_etl(input);
            assert!(trees(&fragment).is_empty());
            assert!(!fragment.errors.is_empty());
        }
    }

    #[test]
    fn header_variants() {
        let cases = [
            ("HTGR_PRA, T1, IE-T1 =", "T1", "IE-T1"),
            ("HTGR_PRA, TREE_1 =", "TREE_1", ""),
            ("HTGR_PRA,TREE_2,IE-TREE_2 =", "TREE_2", "IE-TREE_2"),
            ("HTGR_PRA, TREE_3, IE-TREE_3", "TREE_3", "IE-TREE_3"),
            ("HTGR_PRA, T4, IE-T4, EXTRA = 1", "T4", "IE-T4"),
        ];
        for (line, name, ie) in cases {
            let header = parse_header(line).unwrap_or_else(|| panic!("no header in {line}"));
            assert_eq!(header.name, name);
            assert_eq!(header.initiating_event, ie);
        }
        assert_eq!(parse_header("HTGR_PRA="), None);
        assert_eq!(parse_header("HTGR_PRA, , IE ="), None);
        assert_eq!(parse_header("Y, S1, , OK"), None);
    }

    #[test]
    fn logic_nodesubs_and_text() {
        let content = "HTGR_PRA, LOSP, IE-LOSP =\n\
            ^TOPS\nRPS, ECCS\n\
            ^SEQUENCES\n* header\nY, 1, , OK\nY, 2, , CD\n\
            ^LOGIC\n1, N1\n1, N2\n2, N3\n\
            ^NODESUBS\nNODEPOS 3\nECCS=ECCS-ALT\n\
            ^TEXT\nNODEPOS 1\n\"Reactor trip\"\n\
            ^EOS\n";
        let fragment = parse_etl(content);
        assert!(fragment.is_clean(), "{:?}", fragment.errors);
        let tree = &trees(&fragment)["LOSP"];

        assert_eq!(tree.sequences[0].path, vec!["N1", "N2"]);
        assert_eq!(tree.sequences[1].path, vec!["N3"]);
        assert_eq!(tree.node_substitutions["3"].original, "ECCS");
        assert_eq!(tree.node_substitutions["3"].substitute, "ECCS-ALT");
        assert_eq!(tree.node_descriptions["1"], "Reactor trip");
        assert_eq!(tree.top_events[1].id, "ECCS");
    }

    #[test]
    fn malformed_section_lines_are_recorded() {
        let content = "HTGR_PRA, T1, IE =\n^SEQUENCES\n*\nY, S1\nY, S2, , OK\n^LOGIC\nS9, N1\nlonely\n^NODESUBS\nA=B\n";
        let fragment = parse_etl(content);
        let tree = &trees(&fragment)["T1"];

        assert_eq!(tree.sequences.len(), 1);
        assert_eq!(fragment.errors.len(), 4, "{:?}", fragment.errors);
        assert!(fragment.errors.iter().all(|e| e.starts_with("block 0, line")));
    }

    #[test]
    fn noise_blocks_are_counted_but_not_named() {
        let content = "garbage line\n^EOS\nHTGR_PRA, T1, IE =\n^TOPS\nA\n^EOS\n";
        let fragment = parse_etl(content);
        assert_eq!(trees(&fragment).len(), 1);
        assert_eq!(fragment.errors.len(), 1);
        assert!(fragment.errors[0].contains("expected 2 trees, found 1"));
    }

    #[test]
    fn missing_eos_starts_new_tree_with_warning() {
        let content = "HTGR_PRA, T1, IE-T1 =\n^TOPS\nA\nHTGR_PRA, T2, IE-T2 =\n^TOPS\nB\n";
        let fragment = parse_etl(content);
        assert_eq!(trees(&fragment).keys().collect::<Vec<_>>(), vec!["T1", "T2"]);
        assert_eq!(fragment.errors.len(), 1);
        assert!(fragment.errors[0].contains("T2"));
    }

    #[test]
    fn boms_between_trees() {
        let with_boms = format!(
            "\u{feff}{}",
            TWO_TREES.replace("^EOS\n", "^EOS\n\u{feff}\u{feff}")
        );
        assert_eq!(
            trees(&parse_etl(&with_boms)).len(),
            trees(&parse_etl(TWO_TREES)).len()
        );
    }

    #[test]
    fn repeated_tree_names_merge() {
        let content = "HTGR_PRA, T1, IE =\n^TOPS\nA\n^EOS\nHTGR_PRA, T1, IE =\n^TOPS\nB\n^EOS";
        let fragment = parse_etl(content);
        let tree = &trees(&fragment)["T1"];
        assert_eq!(tree.top_events.len(), 2);
        // Two blocks, one distinct name
        assert_eq!(fragment.errors.len(), 1);
    }

    #[test]
    fn transition_table() {
        assert!(validate_transition(EtlState::Outside, EtlState::InTree).is_ok());
        assert!(validate_transition(EtlState::Outside, EtlState::InLogic).is_err());
        assert!(validate_transition(EtlState::InLogic, EtlState::InText).is_ok());
        assert!(validate_transition(EtlState::InText, EtlState::Outside).is_ok());
    }
}
