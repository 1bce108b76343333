//! Manifest-style relative path helpers.
//!
//! Manifest paths use `\` as their only separator, never start with a
//! separator, and never contain empty components. These helpers convert scan
//! results into that form and derive the folder entries a file implies.

use crate::CANONICAL_SEPARATOR;
use std::collections::HashSet;

/// Converts a relative path into manifest form.
///
/// Both `/` and `\` are treated as separators; empty components (leading,
/// trailing, or doubled separators) are dropped.
///
/// # Examples
///
/// ```
/// use x2sync::scanner::normalize_relative;
///
/// assert_eq!(normalize_relative("/Assets//sprite.png"), "Assets\\sprite.png");
/// ```
#[must_use]
pub fn normalize_relative(path: &str) -> String {
    path.split(['/', CANONICAL_SEPARATOR])
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(&CANONICAL_SEPARATOR.to_string())
}

/// Returns true when the content exclusion filter drops `path`.
///
/// The path is split into at most two parts. Only paths that have a folder
/// component are candidates, and they are excluded when that first component
/// starts with `prefix`.
#[must_use]
pub fn is_excluded(path: &str, prefix: &str) -> bool {
    match path.split_once(CANONICAL_SEPARATOR) {
        Some((first, _)) => first.starts_with(prefix),
        None => false,
    }
}

/// Every strict ancestor folder of a file path, shallowest first.
///
/// `a\b\c.txt` yields `a` and `a\b`. A file at the top level yields nothing.
#[must_use]
pub fn ancestor_folders(path: &str) -> Vec<String> {
    let components: Vec<&str> = path
        .split(CANONICAL_SEPARATOR)
        .filter(|component| !component.is_empty())
        .collect();

    let Some((_, folders)) = components.split_last() else {
        return Vec::new();
    };

    (1..=folders.len())
        .map(|depth| folders[..depth].join(&CANONICAL_SEPARATOR.to_string()))
        .collect()
}

/// Insertion-ordered set of folder paths.
#[derive(Debug, Default)]
pub struct FolderSet {
    /// Paths in first-seen order
    ordered: Vec<String>,
    /// Membership index over `ordered`
    seen: HashSet<String>,
}

impl FolderSet {
    /// Creates an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every ancestor folder of `file`
    pub fn extend_from_file(&mut self, file: &str) {
        for folder in ancestor_folders(file) {
            self.insert(folder);
        }
    }

    /// Inserts `folder`, returning false if it was already present
    pub fn insert(&mut self, folder: String) -> bool {
        if self.seen.contains(&folder) {
            return false;
        }
        self.seen.insert(folder.clone());
        self.ordered.push(folder);
        true
    }

    /// Number of distinct folders
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether no folder has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Consumes the set, returning folders in first-seen order
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
