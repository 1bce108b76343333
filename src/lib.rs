#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # x2sync - Project Manifest Synchronizer
//!
//! x2sync keeps an `.x2proj` project manifest (an XML file listing `Folder`
//! and `Content` items) in step with the files that actually live in the
//! project directory.
//!
//! ## Modes
//!
//! - **Update** (default): every file on disk and every ancestor folder gets an
//!   entry, and all `ItemGroup` elements are collapsed into a single ordered
//!   group. Entries for files that no longer exist are kept.
//! - **Verify** (`--verify-only`): report disk entries missing from the
//!   manifest without touching it.
//!
//! ## Architecture
//!
//! - [`scanner`]: walks the project directory and derives file/folder paths
//! - [`xml`]: owned XML document tree used to read and rewrite the manifest
//! - [`manifest`]: manifest discovery, entry model, load and save
//! - [`reconcile`]: diffing scanned paths against manifest entries
//! - [`commands`]: verify and update drivers used by the binary
//! - [`config`]: configuration file and defaults
//! - [`output`]: console output with verbosity control
//!
//! ## Example Usage
//!
//! ```no_run
//! use x2sync::{SyncContext, commands};
//! use x2sync::config::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = SyncContext::discover("path/to/project".into(), Config::default())?;
//!
//! // Rewrite the manifest to match the disk
//! commands::update::execute(&ctx)?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Verify and update command implementations.
pub mod commands;

/// Configuration parsing, defaults, and validation.
pub mod config;

/// Typed error conditions raised by the synchronizer.
pub mod error;

/// Tracing subscriber setup.
pub mod logging;

/// Manifest discovery, entry model, and persistence.
pub mod manifest;

/// Output formatting and verbosity control.
pub mod output;

/// Set differences between scanned paths and manifest entries.
pub mod reconcile;

/// Project directory scanning.
pub mod scanner;

/// Owned XML document tree.
pub mod xml;

use anyhow::Result;
use std::path::PathBuf;

pub use error::SyncError;

/// Current version of the x2sync binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension of project manifests (without the dot).
pub const MANIFEST_EXTENSION: &str = "x2proj";

/// Path separator used inside manifest `Include` attributes.
pub const CANONICAL_SEPARATOR: char = '\\';

/// Default first-component prefix dropped by the content exclusion filter.
pub const DEFAULT_EXCLUDED_PREFIX: &str = "Content";

/// Central context for a single synchronization run.
///
/// Holds the project directory, the manifest discovered inside it, and the
/// effective configuration. Everything a command needs is reachable from here.
///
/// # Examples
///
/// ```no_run
/// use x2sync::SyncContext;
/// use x2sync::config::Config;
///
/// # fn main() -> anyhow::Result<()> {
/// let ctx = SyncContext::discover("/work/MyMod".into(), Config::default())?;
/// println!("manifest: {}", ctx.manifest_path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Root of the project tree being scanned.
    pub project_dir: PathBuf,

    /// The single `.x2proj` file found directly inside `project_dir`.
    pub manifest_path: PathBuf,

    /// Effective configuration (file values with CLI overrides applied).
    pub config: config::Config,
}

impl SyncContext {
    /// Creates a context by locating the manifest inside `project_dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read, or if it contains
    /// zero or several `.x2proj` files.
    pub fn discover(project_dir: PathBuf, config: config::Config) -> Result<Self> {
        let manifest_path = manifest::find_manifest(&project_dir)?;

        Ok(Self {
            project_dir,
            manifest_path,
            config,
        })
    }

    /// Creates a context with an explicit manifest path, skipping discovery.
    #[must_use]
    pub const fn new_with_explicit_paths(
        project_dir: PathBuf,
        manifest_path: PathBuf,
        config: config::Config,
    ) -> Self {
        Self {
            project_dir,
            manifest_path,
            config,
        }
    }

    /// Builds the scanner configured for this context.
    #[must_use]
    pub fn scanner(&self) -> scanner::PathScanner {
        scanner::PathScanner::new(self.project_dir.clone(), self.manifest_path.clone())
            .exclude_contents(self.config.scan.exclude_contents)
            .excluded_prefix(self.config.scan.excluded_prefix.clone())
            .follow_symlinks(self.config.scan.follow_symlinks)
    }
}
