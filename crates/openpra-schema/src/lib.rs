//! OpenPRA Target Schema
//!
//! Versioned object model of the OpenPRA document format, with
//! version-aware validation, an upgrade graph between versions and JSON
//! file I/O.
//!
//! # Example
//!
//! ```rust
//! use openpra_schema::{empty_instance, upgrade_document, validate_document, SchemaVersion};
//!
//! let old = empty_instance(SchemaVersion::V1_0_0);
//! let upgrade = upgrade_document(&old, SchemaVersion::latest()).unwrap();
//! assert_eq!(upgrade.document["version"], "2.0.0");
//! assert!(validate_document(&upgrade.document).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod instance;
pub mod io;
pub mod upgrade;
pub mod validate;
pub mod version;

// Re-exports for convenience
pub use document::{
    Analysis, Attributes, BasicEventModel, EndStateModel, EventTreeModel, FaultTreeModel,
    GateInput, GateModel, IdRef, InitiatingEventModel, Lmp, Metadata, Models, OpenPraDocument,
    PathStep, SequenceModel, TreeSequence,
};
pub use error::{SchemaError, SchemaIoError, UpgradeError};
pub use instance::{empty_instance, model_keys};
pub use io::{load_document, load_from_file, save_to_file};
pub use upgrade::{upgrade_document, Upgrade, UpgradeGraph, UpgradeStep};
pub use validate::{validate_document, validate_models};
pub use version::{SchemaVersion, UnsupportedVersion, VersionInfo};

/// Prelude for common imports
pub mod prelude {
    pub use crate::document::OpenPraDocument;
    pub use crate::error::{SchemaError, UpgradeError};
    pub use crate::upgrade::upgrade_document;
    pub use crate::validate::validate_document;
    pub use crate::version::SchemaVersion;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
