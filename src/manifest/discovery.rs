use crate::{MANIFEST_EXTENSION, SyncError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds the single `.x2proj` file directly inside `dir`.
///
/// Subdirectories are not searched. The extension is matched without regard
/// to ASCII case.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read, or a [`SyncError`] when it holds
/// no manifest or more than one.
pub fn find_manifest(dir: &Path) -> Result<PathBuf> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry
            .with_context(|| format!("Failed to read project directory {}", dir.display()))?;

        if entry.file_type().is_file() && has_manifest_extension(entry.path()) {
            found.push(entry.into_path());
        }
    }

    match found.len() {
        0 => Err(SyncError::ManifestNotFound {
            dir: dir.to_path_buf(),
        }
        .into()),
        1 => Ok(found.remove(0)),
        _ => Err(SyncError::MultipleManifests {
            dir: dir.to_path_buf(),
            found,
        }
        .into()),
    }
}

/// Whether `path` ends in `.x2proj`.
fn has_manifest_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MANIFEST_EXTENSION))
}
