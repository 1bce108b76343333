use crate::manifest::Manifest;
use crate::output;
use crate::reconcile::{self, Discrepancies};
use crate::{SyncContext, SyncError};
use anyhow::Result;

/// Check that every folder and file on disk is listed in the project file
///
/// Missing folders and files are printed as comma separated lists. The
/// project file is never modified.
///
/// # Errors
///
/// Returns an error if:
/// - The project directory cannot be scanned
/// - The project file cannot be read or parsed
/// - Any folder or file is missing ([`SyncError::VerificationFailed`])
pub fn execute(ctx: &SyncContext) -> Result<Discrepancies> {
    let scan = ctx.scanner().scan()?;
    let manifest = Manifest::load(&ctx.manifest_path)?;

    let discrepancies = reconcile::verify(&manifest, &scan)?;
    report(&discrepancies)?;
    Ok(discrepancies)
}

/// Prints the verification result.
///
/// # Errors
///
/// Returns [`SyncError::VerificationFailed`] when anything is missing.
pub fn report(discrepancies: &Discrepancies) -> Result<()> {
    if discrepancies.is_clean() {
        output::success("Project file is up to date");
        return Ok(());
    }

    output::list("Missing folders", &discrepancies.folders.missing);
    output::list("Missing files", &discrepancies.files.missing);

    Err(SyncError::VerificationFailed {
        missing_folders: discrepancies.folders.missing.clone(),
        missing_files: discrepancies.files.missing.clone(),
    }
    .into())
}
