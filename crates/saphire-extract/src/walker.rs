//! Export directory traversal

use crate::config::ExtractConfig;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Regular file found under the export root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated
    pub relative: String,
    /// Size in bytes
    pub size: u64,
}

/// Files found plus traversal errors
#[derive(Debug, Default)]
pub struct Walk {
    /// Files in sorted traversal order
    pub files: Vec<ExportFile>,
    /// Entries that could not be read
    pub errors: Vec<String>,
}

/// `/`-separated path of `path` below `root`
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_visible(entry: &DirEntry, config: &ExtractConfig) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        !config.skips_dir_name(&name)
    } else {
        !config.skips_file_name(&name)
    }
}

/// Walk `root` recursively in file-name order
///
/// Metadata directories are pruned with their subtree and skipped file
/// names never appear. Symlinks are not followed.
#[must_use]
pub fn walk_export(root: &Path, config: &ExtractConfig) -> Walk {
    let mut walk = Walk::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| is_visible(e, config));

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let size = match entry.metadata() {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        tracing::warn!("Error reading metadata of {}: {}", entry.path().display(), e);
                        walk.errors.push(e.to_string());
                        continue;
                    }
                };
                walk.files.push(ExportFile {
                    relative: relative_path(root, entry.path()),
                    path: entry.into_path(),
                    size,
                });
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
                walk.errors.push(e.to_string());
            }
        }
    }

    tracing::debug!("Found {} files under {}", walk.files.len(), root.display());
    walk
}
