//! Zip archive unpacking

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// Unpacked archive contents
///
/// When no target directory was given the contents live in a temporary
/// directory that is removed when this value is dropped.
#[derive(Debug)]
pub struct ExtractedArchive {
    root: PathBuf,
    entries: usize,
    guard: Option<TempDir>,
}

impl ExtractedArchive {
    /// Directory holding the unpacked files
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Number of entries in the archive
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Whether the directory is removed on drop
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.guard.is_some()
    }
}

/// Unpack with the default configuration
///
/// # Errors
/// See [`extract_archive_with`].
pub fn extract_archive(zip_path: &Path, target: Option<&Path>) -> Result<ExtractedArchive, ExtractError> {
    extract_archive_with(&ExtractConfig::default(), zip_path, target)
}

/// Unpack `zip_path` into `target`, or into a fresh temporary directory
///
/// Entry names that would escape the target directory are rejected by
/// the zip reader.
///
/// # Errors
/// Unreadable file, corrupt archive or write failure.
pub fn extract_archive_with(
    config: &ExtractConfig,
    zip_path: &Path,
    target: Option<&Path>,
) -> Result<ExtractedArchive, ExtractError> {
    let file = File::open(zip_path).map_err(|e| ExtractError::io(zip_path, e))?;
    let mut archive = ZipArchive::new(file)?;

    let (root, guard) = match target {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| ExtractError::io(dir, e))?;
            (dir.to_path_buf(), None)
        }
        None => {
            let temp = tempfile::Builder::new()
                .prefix(&config.temp_prefix)
                .tempdir()
                .map_err(|e| ExtractError::io(std::env::temp_dir(), e))?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };

    tracing::info!("Extracting {} to {}", zip_path.display(), root.display());
    archive.extract(&root)?;

    Ok(ExtractedArchive {
        root,
        entries: archive.len(),
        guard,
    })
}
