//! Command-line interface definitions for x2sync.
//!
//! The CLI definition is shared between the main binary and build tools (like
//! xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Main CLI structure for x2sync.
#[derive(Parser, Debug)]
#[command(
    name = "x2sync",
    version = crate::VERSION,
    about = "Synchronize an .x2proj project file with the project directory",
    long_about = "Adds a Folder or Content entry for every folder and file under the project \
                  directory that the .x2proj file does not list yet, and merges all ItemGroups \
                  into one. With --verify-only, reports the missing entries instead."
)]
pub struct Cli {
    /// Project directory containing exactly one .x2proj file
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Only check the project file; exit with status 1 if entries are missing
    #[arg(long)]
    pub verify_only: bool,

    /// Skip files whose top-level folder starts with "Content"
    #[arg(long)]
    pub exclude_contents: bool,

    /// Configuration file (defaults to <config dir>/x2sync/config.toml when present)
    #[arg(long, value_name = "FILE", env = "X2SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Project directory with a leading `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the path starts with `~` and the home directory
    /// cannot be determined.
    pub fn resolved_project_dir(&self) -> Result<PathBuf> {
        expand_tilde(&self.project_dir)
    }

    /// Config path with a leading `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn resolved_config(&self) -> Result<Option<PathBuf>> {
        self.config.as_deref().map(expand_tilde).transpose()
    }
}

/// Expands a leading `~` component to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path starts with `~` and the home directory
/// cannot be determined.
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().context("Could not find home directory")?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["x2sync", "proj", "--verify-only", "--exclude-contents"])
            .unwrap();
        assert_eq!(cli.project_dir, PathBuf::from("proj"));
        assert!(cli.verify_only);
        assert!(cli.exclude_contents);
    }

    #[test]
    fn test_flags_may_precede_directory() {
        let cli = Cli::try_parse_from(["x2sync", "--exclude-contents", "proj"]).unwrap();
        assert_eq!(cli.project_dir, PathBuf::from("proj"));
        assert!(!cli.verify_only);
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        assert!(Cli::try_parse_from(["x2sync", "--verify-only"]).is_err());
    }

    #[test]
    fn test_expand_tilde() -> Result<()> {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~/mods/A"))?, home.join("mods/A"));
        assert_eq!(expand_tilde(Path::new("~"))?, home);
        assert_eq!(expand_tilde(Path::new("rel/~x"))?, PathBuf::from("rel/~x"));
        assert_eq!(expand_tilde(Path::new("~user"))?, PathBuf::from("~user"));
        Ok(())
    }

    #[test]
    fn test_extra_directory_is_rejected() {
        assert!(Cli::try_parse_from(["x2sync", "one", "two"]).is_err());
    }
}
