//! Reconciling scanned paths with manifest entries.
//!
//! The set difference only runs from disk to manifest: paths found on disk
//! without an entry are reported (verify) or added (update). Entries whose
//! file or folder no longer exists are left in place in both modes.

use crate::manifest::{EntryKind, GroupItem, Manifest, ManifestEntry};
use crate::scanner::ScanResult;
use anyhow::Result;
use std::collections::HashSet;
use tracing::{Level, debug, span};

/// What a reconciliation run does with its findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report missing entries, change nothing
    Verify,
    /// Add missing entries and merge all item groups
    Update,
}

/// Paths of one kind that differ between disk and manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathDiff {
    /// On disk, not in the manifest (scan order)
    pub missing: Vec<String>,
    /// In the manifest, not on disk (manifest order)
    pub stale: Vec<String>,
}

/// Result of comparing a manifest against a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discrepancies {
    /// Folder differences
    pub folders: PathDiff,
    /// File differences
    pub files: PathDiff,
}

impl Discrepancies {
    /// True when every scanned path has an entry.
    ///
    /// Stale entries do not count against a clean result.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.folders.missing.is_empty() && self.files.missing.is_empty()
    }
}

/// What an update changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Folder entries created, in scan order
    pub added_folders: Vec<String>,
    /// Content entries created, in scan order
    pub added_files: Vec<String>,
    /// Number of item groups before consolidation
    pub groups_merged: usize,
}

impl UpdateSummary {
    /// True when no entry was added.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added_folders.is_empty() && self.added_files.is_empty()
    }
}

/// Outcome of [`Reconciler::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Verify mode result
    Verified(Discrepancies),
    /// Update mode result
    Updated(UpdateSummary),
}

/// Runs either reconciliation mode behind a single flag.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    /// Selected mode
    mode: Mode,
}

impl Reconciler {
    /// Creates a reconciler for `mode`.
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Selected mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Reconciles `manifest` with `scan`.
    ///
    /// In update mode the manifest is modified in memory; saving it is left
    /// to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry lacks its `Include` attribute.
    pub fn run(&self, manifest: &mut Manifest, scan: &ScanResult) -> Result<Outcome> {
        match self.mode {
            Mode::Verify => verify(manifest, scan).map(Outcome::Verified),
            Mode::Update => update(manifest, scan).map(Outcome::Updated),
        }
    }
}

/// Compares the manifest with the scan without modifying anything.
///
/// # Errors
///
/// Returns an error if an existing entry lacks its `Include` attribute.
pub fn verify(manifest: &Manifest, scan: &ScanResult) -> Result<Discrepancies> {
    let span = span!(Level::DEBUG, "verify", manifest = %manifest.path().display());
    let _enter = span.enter();

    let items = manifest.items()?;

    let discrepancies = Discrepancies {
        folders: diff_kind(&items, EntryKind::Folder, &scan.folders),
        files: diff_kind(&items, EntryKind::Content, &scan.files),
    };

    debug!(
        missing_folders = discrepancies.folders.missing.len(),
        missing_files = discrepancies.files.missing.len(),
        stale_folders = discrepancies.folders.stale.len(),
        stale_files = discrepancies.files.stale.len(),
        "verification complete"
    );
    Ok(discrepancies)
}

/// Adds entries for unlisted paths and merges all item groups into one.
///
/// Folders are processed before files. New entries are appended after the
/// existing ones of their kind, in scan order.
///
/// # Errors
///
/// Returns an error if an existing entry lacks its `Include` attribute.
pub fn update(manifest: &mut Manifest, scan: &ScanResult) -> Result<UpdateSummary> {
    let span = span!(Level::DEBUG, "update", manifest = %manifest.path().display());
    let _enter = span.enter();

    let mut items = manifest.items()?;
    let groups_merged = manifest.group_count()?;

    let added_folders = missing_paths(&items, EntryKind::Folder, &scan.folders);
    let added_files = missing_paths(&items, EntryKind::Content, &scan.files);

    for stale in stale_paths(&items, EntryKind::Folder, &scan.folders)
        .into_iter()
        .chain(stale_paths(&items, EntryKind::Content, &scan.files))
    {
        debug!(path = %stale, "keeping entry with no match on disk");
    }

    let namespace = manifest.namespace().clone();
    for (kind, paths) in [
        (EntryKind::Folder, &added_folders),
        (EntryKind::Content, &added_files),
    ] {
        items.extend(
            paths
                .iter()
                .map(|path| GroupItem::Entry(ManifestEntry::new(kind, path, &namespace))),
        );
    }

    manifest.consolidate(items)?;

    debug!(
        added_folders = added_folders.len(),
        added_files = added_files.len(),
        groups_merged,
        "update complete"
    );
    Ok(UpdateSummary {
        added_folders,
        added_files,
        groups_merged,
    })
}

/// Canonical paths of every entry of `kind`.
fn existing_paths(items: &[GroupItem], kind: EntryKind) -> Vec<&str> {
    items
        .iter()
        .filter_map(GroupItem::as_entry)
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.path.as_str())
        .collect()
}

/// Distinct elements of `left` absent from `right`, in `left` order.
fn difference<'a, L, R>(left: L, right: R) -> Vec<String>
where
    L: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = &'a str>,
{
    let mut excluded: HashSet<&str> = right.into_iter().collect();
    left.into_iter()
        .filter(|path| excluded.insert(*path))
        .map(str::to_string)
        .collect()
}

/// Scanned paths of `kind` that have no entry.
fn missing_paths(items: &[GroupItem], kind: EntryKind, scanned: &[String]) -> Vec<String> {
    difference(
        scanned.iter().map(String::as_str),
        existing_paths(items, kind),
    )
}

/// Entries of `kind` whose path was not scanned.
fn stale_paths(items: &[GroupItem], kind: EntryKind, scanned: &[String]) -> Vec<String> {
    difference(
        existing_paths(items, kind),
        scanned.iter().map(String::as_str),
    )
}

/// Both directions of the difference for one kind.
fn diff_kind(items: &[GroupItem], kind: EntryKind, scanned: &[String]) -> PathDiff {
    PathDiff {
        missing: missing_paths(items, kind, scanned),
        stale: stale_paths(items, kind, scanned),
    }
}
