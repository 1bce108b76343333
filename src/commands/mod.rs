//! Command drivers used by the binary.
//!
//! Each command scans the project directory, loads the project file, runs one
//! reconciliation mode, and reports the result.

/// Update mode: add missing entries and rewrite the project file.
pub mod update;
/// Verify mode: report missing entries without writing.
pub mod verify;

use crate::SyncContext;
use crate::manifest::Manifest;
use crate::output;
use crate::reconcile::{Mode, Outcome, Reconciler};
use anyhow::Result;

/// Prints which directory and project file the run works on.
pub fn print_header(ctx: &SyncContext) {
    output::info(&format!("Project directory is {}", ctx.project_dir.display()));
    output::info(&format!("Project file      is {}", ctx.manifest_path.display()));
    output::info("");
}

/// Runs the command for `mode`.
///
/// # Errors
///
/// Returns an error if scanning, loading, or saving fails; in verify mode
/// that includes [`crate::SyncError::VerificationFailed`].
pub fn run(ctx: &SyncContext, mode: Mode) -> Result<Outcome> {
    print_header(ctx);

    let scan = ctx.scanner().scan()?;
    let mut manifest = Manifest::load(&ctx.manifest_path)?;
    let outcome = Reconciler::new(mode).run(&mut manifest, &scan)?;

    match &outcome {
        Outcome::Verified(discrepancies) => verify::report(discrepancies)?,
        Outcome::Updated(summary) => update::finish(ctx, &manifest, summary)?,
    }
    Ok(outcome)
}
