//! SAPHIRE Unified Document Model
//!
//! The aggregated, schema-shaped representation of a SAPHIRE export:
//! project metadata, fault trees, event trees, basic events, end states
//! and sequences.
//!
//! # Core Concepts
//!
//! - [`UnifiedDocument`]: the whole model, JSON round-trippable
//! - [`DocumentBuilder`]: incremental folding with per-collection de-duplication
//! - [`validation`]: structural checks on JSON-shaped candidates
//!
//! # Example
//!
//! ```rust
//! use saphire_model::{DocumentBuilder, EventSequence, EventTree};
//!
//! let mut builder = DocumentBuilder::new();
//! let mut tree = EventTree::new("LOSP");
//! tree.sequences.push(EventSequence::new("S1", "OK"));
//! builder.add_event_tree(tree);
//!
//! let document = builder.finish();
//! assert_eq!(document.event_trees.len(), 1);
//! // End states are inferred from event sequences
//! assert_eq!(document.end_states[0].id, "OK");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod builder;
pub mod document;
pub mod gate;
pub mod validation;

// Re-exports for convenience
pub use builder::{DocumentBuilder, Insertion};
pub use document::{
    BasicEvent, DocumentSummary, EndState, EventSequence, EventTree, FaultTree, Gate,
    NodeSubstitution, ProjectInfo, Reference, ReferenceKind, Sequence, TopEvent, UnifiedDocument, UNKNOWN_ID,
};
pub use gate::GateType;
pub use validation::{
    validate_basic_event, validate_document, validate_event_tree, validate_fault_tree, verdict,
    ValidationError,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the unified document
    pub use crate::builder::{DocumentBuilder, Insertion};
    pub use crate::document::*;
    pub use crate::gate::GateType;
    pub use crate::validation::ValidationError;
}
