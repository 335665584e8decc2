//! SAPHIRE Format Parsers
//!
//! Classification and parsing of legacy SAPHIRE text exports into typed
//! fragments of the unified document.
//!
//! # Pipeline
//!
//! 1. [`classify`] maps a path to a [`FileCategory`]
//! 2. [`LegacyFormat::detect`] selects a parser from the [`ParserRegistry`]
//! 3. The parser turns text into a [`Fragment`] plus non-fatal errors
//!
//! # Example
//!
//! ```rust
//! use saphire_parsers::parse_etl;
//!
//! let fragment = parse_etl("HTGR_PRA, T1, IE-T1 =\n^TOPS\nA,B\n^EOS");
//! let trees = fragment.event_trees().unwrap();
//! assert_eq!(trees["T1"].top_events.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod classify;
pub mod fragment;
pub mod parsers;
pub mod text;

// Re-exports for convenience
pub use classify::{classify, describe, extension_of, FileCategory, LegacyFormat};
pub use fragment::{BasicEventRow, Fragment, FragmentData, SequenceRow};
pub use parsers::etl::{allowed_transitions, EtlState, TreeContext};
pub use parsers::{
    default_parsers, parse_bei, parse_esd, parse_etl, parse_fad, parse_file, parse_ftl,
    parse_json, parse_mard, parse_sql, parse_sqd, parse_stl, ParserRegistry, SaphireParser,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
