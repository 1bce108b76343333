//! Configuration for x2sync.
//!
//! Configuration is optional. Values come from, in order of precedence:
//! 1. command-line flags (applied by the binary after loading)
//! 2. the file named by `--config` / `X2SYNC_CONFIG`
//! 3. `<config dir>/x2sync/config.toml` when it exists
//! 4. built-in defaults

/// Detection of unknown configuration keys.
pub mod validator;

use crate::DEFAULT_EXCLUDED_PREFIX;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "x2sync";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Largest accepted indentation width for the rewritten manifest.
pub const MAX_INDENT: usize = 16;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    /// Directory scanning options
    #[serde(default)]
    pub scan: ScanConfig,

    /// Manifest writing options
    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// Options controlling the directory scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanConfig {
    /// Drop files whose top-level folder starts with `excluded_prefix`
    #[serde(default)]
    pub exclude_contents: bool,
    /// Prefix used by the exclusion filter
    #[serde(default = "default_excluded_prefix")]
    pub excluded_prefix: String,
    /// Whether to follow symbolic links while walking
    #[serde(default)]
    pub follow_symlinks: bool,
}

/// Options controlling how the manifest is written back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestConfig {
    /// Write through a temporary file and rename it over the original
    #[serde(default = "default_atomic_write")]
    pub atomic_write: bool,
    /// Line ending policy for the rewritten file
    #[serde(default)]
    pub line_ending: LineEnding,
    /// Spaces per nesting level
    #[serde(default = "default_indent")]
    pub indent: usize,
}

/// Line ending policy for the rewritten manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Keep CRLF if the original file used it, otherwise LF
    #[default]
    Preserve,
    /// Always `\n`
    Lf,
    /// Always `\r\n`
    Crlf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_contents: false,
            excluded_prefix: default_excluded_prefix(),
            follow_symlinks: false,
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            atomic_write: default_atomic_write(),
            line_ending: LineEnding::default(),
            indent: default_indent(),
        }
    }
}

impl Config {
    /// Location of the per-user configuration file, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolves the configuration for a run.
    ///
    /// An explicit path must exist. Without one, the per-user file is used when
    /// present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read, parsed, or fails
    /// validation.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The file contains invalid TOML
    /// - A value is out of range
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        validator::ConfigValidator::new().warn_unknown_fields(&content);

        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is out of range.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if `manifest.indent` exceeds [`MAX_INDENT`] or
    /// `scan.excluded_prefix` is empty while the filter is enabled.
    pub fn validate(&self) -> Result<()> {
        if self.manifest.indent > MAX_INDENT {
            anyhow::bail!(
                "manifest.indent must be at most {MAX_INDENT}, got {}",
                self.manifest.indent
            );
        }
        if self.scan.exclude_contents && self.scan.excluded_prefix.is_empty() {
            anyhow::bail!("scan.excluded_prefix cannot be empty when exclude_contents is enabled");
        }
        Ok(())
    }

    /// Applies command-line overrides on top of loaded values.
    ///
    /// Flags can only switch the filter on; a config file that enables it
    /// cannot be turned off from the command line.
    #[must_use]
    pub fn with_cli_overrides(mut self, exclude_contents: bool) -> Self {
        self.scan.exclude_contents |= exclude_contents;
        self
    }
}

// Default functions for serde
fn default_excluded_prefix() -> String {
    DEFAULT_EXCLUDED_PREFIX.to_string()
}

const fn default_atomic_write() -> bool {
    true
}

const fn default_indent() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.scan.exclude_contents);
        assert_eq!(config.scan.excluded_prefix, "Content");
        assert!(!config.scan.follow_symlinks);
        assert!(config.manifest.atomic_write);
        assert_eq!(config.manifest.line_ending, LineEnding::Preserve);
        assert_eq!(config.manifest.indent, 2);
    }

    #[test]
    fn test_parse_partial_file_fills_defaults() -> Result<()> {
        let config = Config::parse(
            r#"
            [scan]
            exclude_contents = true

            [manifest]
            line_ending = "crlf"
            "#,
        )?;
        assert!(config.scan.exclude_contents);
        assert_eq!(config.scan.excluded_prefix, "Content");
        assert_eq!(config.manifest.line_ending, LineEnding::Crlf);
        assert!(config.manifest.atomic_write);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_large_indent() {
        let err = Config::parse("[manifest]\nindent = 40\n").unwrap_err();
        assert!(err.to_string().contains("indent"));
    }

    #[test]
    fn test_parse_rejects_empty_prefix_with_filter() {
        let result = Config::parse("[scan]\nexclude_contents = true\nexcluded_prefix = \"\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[scan]\nfollow_symlinks = true\n\n[manifest]\nindent = 4\natomic_write = false\n",
        )?;

        let loaded = Config::load(&path)?;
        assert!(loaded.scan.follow_symlinks);
        assert_eq!(loaded.manifest.indent, 4);
        assert!(!loaded.manifest.atomic_write);
        assert_eq!(loaded.scan.excluded_prefix, "Content");
        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        assert!(Config::resolve(Some(&missing)).is_err());
    }

    #[test]
    fn test_cli_override_only_enables() {
        let config = Config::default().with_cli_overrides(true);
        assert!(config.scan.exclude_contents);

        let mut enabled = Config::default();
        enabled.scan.exclude_contents = true;
        assert!(enabled.with_cli_overrides(false).scan.exclude_contents);
    }
}
