//! Project directory scanner.
//!
//! The `PathScanner` walks the project directory and returns every file as a
//! manifest-style relative path, together with every folder those files live
//! in. The manifest file itself is never reported.

/// Manifest-style path normalization and folder derivation.
pub mod paths;

pub use paths::{FolderSet, ancestor_folders, is_excluded, normalize_relative};

use crate::{DEFAULT_EXCLUDED_PREFIX, SyncError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span, trace};
use walkdir::{DirEntry, WalkDir};

/// Files and folders found on disk, in manifest form.
///
/// Both lists are free of duplicates. Files are ordered by a directory walk
/// sorted by file name; folders are ordered by first discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Relative file paths (`Assets\sprite.png`)
    pub files: Vec<String>,
    /// Relative folder paths without trailing separator (`Assets`)
    pub folders: Vec<String>,
}

impl ScanResult {
    /// Builds a result from file paths, deriving their folders.
    #[must_use]
    pub fn from_files(files: Vec<String>) -> Self {
        let mut folders = FolderSet::new();
        for file in &files {
            folders.extend_from_file(file);
        }
        Self {
            files,
            folders: folders.into_vec(),
        }
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }
}

/// Scanner for enumerating the files of a project directory
#[derive(Debug, Clone)]
pub struct PathScanner {
    /// Project directory being scanned
    root: PathBuf,
    /// Manifest file to leave out of the results
    manifest_path: PathBuf,
    /// Whether the content exclusion filter is active
    exclude_contents: bool,
    /// Prefix matched by the exclusion filter
    excluded_prefix: String,
    /// Whether to follow symbolic links
    follow_symlinks: bool,
}

impl PathScanner {
    /// Create a new scanner
    ///
    /// # Arguments
    ///
    /// * `root` - Project directory to walk
    /// * `manifest_path` - Manifest file inside `root` that must not be listed
    #[must_use]
    pub fn new(root: PathBuf, manifest_path: PathBuf) -> Self {
        Self {
            root,
            manifest_path,
            exclude_contents: false,
            excluded_prefix: DEFAULT_EXCLUDED_PREFIX.to_string(),
            follow_symlinks: false,
        }
    }

    /// Enables or disables the content exclusion filter
    #[must_use]
    pub const fn exclude_contents(mut self, enabled: bool) -> Self {
        self.exclude_contents = enabled;
        self
    }

    /// Sets the prefix used by the content exclusion filter
    #[must_use]
    pub fn excluded_prefix(mut self, prefix: String) -> Self {
        self.excluded_prefix = prefix;
        self
    }

    /// Sets whether symbolic links are followed
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Project directory this scanner walks
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the project directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The root directory does not exist or cannot be read
    /// - A file path does not start with the root directory
    /// - A file path is not valid UTF-8
    pub fn scan(&self) -> Result<ScanResult> {
        let span = span!(Level::DEBUG, "scan", root = %self.root.display());
        let _enter = span.enter();

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| {
                format!("Failed to read directory entry in {}", self.root.display())
            })?;

            if !is_listed_file(&entry) || entry.path() == self.manifest_path {
                continue;
            }

            let relative = self.relative_path(entry.path())?;
            if self.exclude_contents && is_excluded(&relative, &self.excluded_prefix) {
                trace!(path = %relative, "excluded by content filter");
                continue;
            }

            files.push(relative);
        }

        let result = ScanResult::from_files(files);
        debug!(
            files = result.files.len(),
            folders = result.folders.len(),
            "scan complete"
        );
        Ok(result)
    }

    /// Strips the root prefix from `path` and normalizes the remainder
    fn relative_path(&self, path: &Path) -> Result<String> {
        let stripped = path
            .strip_prefix(&self.root)
            .map_err(|_| SyncError::PathOutsideRoot {
                path: path.to_path_buf(),
                root: self.root.clone(),
            })?;

        let Some(text) = stripped.to_str() else {
            anyhow::bail!("Path is not valid UTF-8: {}", path.display());
        };

        Ok(normalize_relative(text))
    }
}

/// Regular files, and symlinks that resolve to one.
///
/// Without link following, walkdir reports a symlink's own type, so the
/// target is checked instead. Links to directories are never descended into.
fn is_listed_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
