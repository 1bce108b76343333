//! Error conditions with a meaning of their own.
//!
//! Most failures travel as `anyhow::Error` with context attached. The
//! variants here are the ones the binary needs to recognise (to choose an
//! exit status) or that tests assert on directly.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions detected while synchronizing a project.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No `.x2proj` file directly inside the project directory.
    #[error("Failed to find .x2proj file in {}", dir.display())]
    ManifestNotFound {
        /// Directory that was searched
        dir: PathBuf,
    },

    /// More than one `.x2proj` file directly inside the project directory.
    #[error("Found more than one .x2proj file in {}: {}", dir.display(), join_paths(found))]
    MultipleManifests {
        /// Directory that was searched
        dir: PathBuf,
        /// Every candidate that matched
        found: Vec<PathBuf>,
    },

    /// The manifest has no `Project` root element.
    #[error("No Project element in {}", path.display())]
    ProjectElementMissing {
        /// Manifest that was parsed
        path: PathBuf,
    },

    /// A `Folder` or `Content` entry lacks its `Include` attribute.
    #[error(
        "{element} entry #{} in ItemGroup #{} has no Include attribute",
        .position + 1,
        .group + 1
    )]
    MissingInclude {
        /// Element name as written in the manifest
        element: String,
        /// Zero-based index of the group among the project's item groups
        group: usize,
        /// Zero-based index of the entry inside its group
        position: usize,
    },

    /// A scanned file did not start with the project directory prefix.
    #[error("Path {} does not start with {}", path.display(), root.display())]
    PathOutsideRoot {
        /// The offending path
        path: PathBuf,
        /// Root the path was expected to live under
        root: PathBuf,
    },

    /// Verify mode found disk entries missing from the manifest.
    #[error("Project file missing folders or files.")]
    VerificationFailed {
        /// Folders present on disk but not in the manifest
        missing_folders: Vec<String>,
        /// Files present on disk but not in the manifest
        missing_files: Vec<String>,
    },
}

impl SyncError {
    /// Process exit status for this condition.
    ///
    /// Verification failures exit with `1` so scripts can tell them apart
    /// from configuration or I/O problems, which exit with `2`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::VerificationFailed { .. } => 1,
            _ => 2,
        }
    }
}

/// Renders a list of paths as a comma separated string.
fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let verify = SyncError::VerificationFailed {
            missing_folders: vec!["Assets".into()],
            missing_files: Vec::new(),
        };
        assert_eq!(verify.exit_code(), 1);

        let missing = SyncError::ManifestNotFound {
            dir: PathBuf::from("/tmp/project"),
        };
        assert_eq!(missing.exit_code(), 2);
    }

    #[test]
    fn test_multiple_manifests_message_lists_candidates() {
        let err = SyncError::MultipleManifests {
            dir: PathBuf::from("proj"),
            found: vec![PathBuf::from("proj/a.x2proj"), PathBuf::from("proj/b.x2proj")],
        };
        let message = err.to_string();
        assert!(message.contains("a.x2proj"));
        assert!(message.contains("b.x2proj"));
    }

    #[test]
    fn test_missing_include_message() {
        let err = SyncError::MissingInclude {
            element: "Content".into(),
            group: 1,
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "Content entry #4 in ItemGroup #2 has no Include attribute"
        );
    }
}
