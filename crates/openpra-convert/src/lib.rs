//! SAPHIRE to OpenPRA Conversion
//!
//! Turns a SAPHIRE model into an [`OpenPraDocument`](openpra_schema::OpenPraDocument)
//! at the latest schema version. Input can be a typed
//! [`UnifiedDocument`](saphire_model::UnifiedDocument), an
//! [`ExtractionReport`](saphire_extract::ExtractionReport), or raw JSON in
//! any of the job, bare-model or legacy per-file layouts.
//!
//! # Example
//!
//! ```rust
//! use openpra_convert::to_openpra;
//! use serde_json::json;
//!
//! let out = to_openpra(&json!({
//!     "project": {"name": "HTGR"},
//!     "fault_trees": [{"id": "FT1", "gates": [{"id": "G1", "type": "a", "inputs": ["BE1"]}]}],
//!     "event_trees": []
//! }))
//! .unwrap();
//! assert_eq!(out["metadata"]["title"], "PRA Model: HTGR");
//! assert_eq!(out["models"]["fault_trees"][0]["gates"][0]["type"], "AND");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod converter;
pub mod error;
pub mod normalize;
pub mod source;

// Re-exports for convenience
pub use config::ConverterConfig;
pub use converter::{to_openpra, Conversion, Converter};
pub use error::ConvertError;
pub use normalize::{normalize_gate_type, normalize_path};
pub use source::{ConversionInput, LegacyEntry, ParsedInput, SkippedItem, SourceModel};

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::ConverterConfig;
    pub use crate::converter::{Conversion, Converter};
    pub use crate::error::ConvertError;
    pub use crate::source::ConversionInput;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
