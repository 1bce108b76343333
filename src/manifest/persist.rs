//! Writing the manifest back to disk.
//!
//! By default the new content goes to a temporary file in the same directory
//! which is then renamed over the target, so a crash mid-write leaves either
//! the old or the new manifest, never a truncated one.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write content to a file atomically using a temporary file.
///
/// This function:
/// - Creates a temp file in the same directory as the target (required for atomic rename)
/// - Writes the content and syncs it to disk
/// - Gives the temp file the permissions of the file it replaces, if any
/// - Renames the temp file over the target
/// - Removes the temp file if any step fails
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be determined
/// - The temp file cannot be created or written
/// - The rename fails
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write temporary file")?;
    temp_file.flush().context("Failed to flush temporary file")?;

    // The temp file is created 0600; keep the target's mode across the rename
    if let Ok(metadata) = std::fs::metadata(path) {
        temp_file
            .as_file()
            .set_permissions(metadata.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// Overwrites `path` in place.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn overwrite(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
