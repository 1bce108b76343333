use crate::SyncContext;
use crate::manifest::Manifest;
use crate::output;
use crate::reconcile::{self, UpdateSummary};
use anyhow::Result;

/// Add missing entries to the project file and merge its item groups
///
/// The file is always rewritten, even when no entry was added, so that
/// split item groups are merged.
///
/// # Errors
///
/// Returns an error if:
/// - The project directory cannot be scanned
/// - The project file cannot be read, parsed, or written
/// - An existing entry has no `Include` attribute
pub fn execute(ctx: &SyncContext) -> Result<UpdateSummary> {
    let scan = ctx.scanner().scan()?;
    let mut manifest = Manifest::load(&ctx.manifest_path)?;

    let summary = reconcile::update(&mut manifest, &scan)?;
    finish(ctx, &manifest, &summary)?;
    Ok(summary)
}

/// Saves the updated manifest and prints what changed.
///
/// # Errors
///
/// Returns an error if the project file cannot be written.
pub fn finish(ctx: &SyncContext, manifest: &Manifest, summary: &UpdateSummary) -> Result<()> {
    manifest.save(&ctx.config.manifest)?;

    for folder in &summary.added_folders {
        output::verbose(&format!("  folder  {folder}"));
    }
    for file in &summary.added_files {
        output::verbose(&format!("  content {file}"));
    }

    output::action(
        "Added",
        &format!(
            "{} folders, {} files",
            summary.added_folders.len(),
            summary.added_files.len()
        ),
    );
    if summary.groups_merged > 1 {
        output::action("Merged", &format!("{} item groups", summary.groups_merged));
    }
    output::action("Wrote", &ctx.manifest_path.display().to_string());

    Ok(())
}
