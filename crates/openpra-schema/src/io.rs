//! JSON files on disk

use crate::document::OpenPraDocument;
use crate::error::SchemaIoError;
use crate::upgrade::upgrade_document;
use crate::validate::validate_document;
use crate::version::SchemaVersion;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Write `document` as pretty-printed JSON, creating parent directories
///
/// # Errors
/// Directory creation, serialization or write failure.
pub fn save_to_file<T: Serialize + ?Sized>(document: &T, path: &Path) -> Result<(), SchemaIoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SchemaIoError::io(parent, e))?;
    }
    let text = serde_json::to_string_pretty(document)?;
    fs::write(path, text).map_err(|e| SchemaIoError::io(path, e))?;
    tracing::info!("Saved OpenPRA document to {}", path.display());
    Ok(())
}

/// Read a document and validate it
///
/// With `auto_upgrade`, a document declaring a version older than
/// [`SchemaVersion::latest`] is upgraded before validation.
///
/// # Errors
/// Unreadable file, invalid JSON, failed upgrade or failed validation.
pub fn load_from_file(path: &Path, auto_upgrade: bool) -> Result<Value, SchemaIoError> {
    let text = fs::read_to_string(path).map_err(|e| SchemaIoError::io(path, e))?;
    let mut document: Value = serde_json::from_str(&text)?;

    if auto_upgrade && needs_upgrade(&document) {
        let upgrade = upgrade_document(&document, SchemaVersion::latest())?;
        tracing::info!("{} ({})", upgrade.message(), path.display());
        document = upgrade.document;
    }

    validate_document(&document)?;
    Ok(document)
}

/// [`load_from_file`] followed by typed deserialization
///
/// # Errors
/// See [`load_from_file`]; also fails when entries do not fit the typed model.
pub fn load_document(path: &Path, auto_upgrade: bool) -> Result<OpenPraDocument, SchemaIoError> {
    let value = load_from_file(path, auto_upgrade)?;
    Ok(OpenPraDocument::from_value(value)?)
}

fn needs_upgrade(document: &Value) -> bool {
    document
        .get("version")
        .and_then(Value::as_str)
        .and_then(|v| v.parse::<SchemaVersion>().ok())
        .is_some_and(|v| v < SchemaVersion::latest())
}
