#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use x2sync::SyncContext;
use x2sync::config::Config;

/// Manifest name used by every fixture.
pub const MANIFEST_NAME: &str = "Mod.x2proj";

/// Test project fixture: a temporary directory with one manifest.
pub struct TestProject {
    pub temp_dir: TempDir,
    pub manifest_path: PathBuf,
}

impl TestProject {
    /// Create a project whose manifest holds `manifest`.
    pub fn new(manifest: &str) -> Result<Self> {
        Self::with_bytes(manifest.as_bytes())
    }

    /// Create a project from raw manifest bytes (for BOM and CRLF cases).
    pub fn with_bytes(manifest: &[u8]) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let manifest_path = temp_dir.path().join(MANIFEST_NAME);
        fs::write(&manifest_path, manifest)?;
        Ok(Self {
            temp_dir,
            manifest_path,
        })
    }

    /// Get the project directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and its parent folders) below the project directory.
    pub fn add_file(&self, relative: &str) -> Result<()> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "data")?;
        Ok(())
    }

    /// Create several files at once.
    pub fn add_files(&self, relative: &[&str]) -> Result<()> {
        relative.iter().try_for_each(|file| self.add_file(file))
    }

    /// Context with default configuration, found through discovery.
    pub fn context(&self) -> Result<SyncContext> {
        self.context_with(Config::default())
    }

    /// Context with a custom configuration.
    pub fn context_with(&self, config: Config) -> Result<SyncContext> {
        SyncContext::discover(self.path().to_path_buf(), config)
    }

    /// Current manifest text.
    pub fn manifest_text(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.manifest_path)?)
    }

    /// Current manifest bytes.
    pub fn manifest_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.manifest_path)?)
    }
}
