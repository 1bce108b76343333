use anyhow::Result;
use clap::Parser;
use std::process;
use x2sync::cli::Cli;
use x2sync::config::Config;
use x2sync::output::{self, Verbosity};
use x2sync::reconcile::Mode;
use x2sync::{SyncContext, SyncError, commands, logging};

/// Exit status for fatal errors that are not a [`SyncError`].
const EXIT_FAILURE: i32 = 2;

fn main() {
    if let Err(e) = run() {
        output::error(&format!("Error: {e:#}"));
        let code = e
            .downcast_ref::<SyncError>()
            .map_or(EXIT_FAILURE, SyncError::exit_code);
        process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    output::set_verbosity(verbosity);
    logging::init(verbosity);

    let config = Config::resolve(cli.resolved_config()?.as_deref())?
        .with_cli_overrides(cli.exclude_contents);
    tracing::debug!(?config, "effective configuration");

    let ctx = SyncContext::discover(cli.resolved_project_dir()?, config)?;

    let mode = if cli.verify_only {
        Mode::Verify
    } else {
        Mode::Update
    };
    commands::run(&ctx, mode)?;

    Ok(())
}
