//! CLI command handler: resolve the directory, run one batch, map the result to an exit status.

use anyhow::anyhow;
use log::{debug, error, warn};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::process::ExitCode;
use thiserror::Error;

use crate::engine::arg_parser::Cli;
use crate::engine::prompt::{resolve_directory, wait_for_enter};
use crate::utils::{apply_file_to_opts, load_xmpair_toml, set_verbose, setup_logging};
use crate::{Opts, RunReport, pair_dir};

/// Process exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every pair succeeded, or there was nothing to do.
    Clean,
    /// At least one pair failed, or the run failed unexpectedly.
    Failures,
    /// The input directory was invalid.
    InvalidInput,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Clean => 0,
            ExitStatus::Failures => 1,
            ExitStatus::InvalidInput => 2,
        }
    }

    pub fn from_report(report: &RunReport) -> Self {
        if report.is_clean() {
            ExitStatus::Clean
        } else {
            ExitStatus::Failures
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Anything that escaped the batch: scan errors, report write errors, panics.
#[derive(Debug, Error)]
#[error("An unexpected error occurred: {0:#}")]
pub struct UnexpectedFailure(pub anyhow::Error);

/// Defaults, then `.xmpair.toml` in `dir`, then CLI flags.
fn setup_opts(cli: &Cli, dir: &Path) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = load_xmpair_toml(dir) {
        debug!("Loaded settings from {}", dir.display());
        apply_file_to_opts(&file, dir, &mut opts);
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(v) = cli.dry_run {
        opts.dry_run = v;
    }
    if let Some(v) = cli.pause {
        opts.pause = v;
    }
    if let Some(ref p) = cli.report {
        opts.report_path = Some(p.clone());
    }
    opts
}

/// Run the batch behind the top-level error boundary.
pub fn run_guarded(dir: &Path, opts: &Opts) -> Result<RunReport, UnexpectedFailure> {
    catch_unwind(AssertUnwindSafe(|| pair_dir(dir, opts)))
        .map_err(|_| UnexpectedFailure(anyhow!("run panicked")))?
        .map_err(UnexpectedFailure)
}

/// Resolve the directory (argument or prompt), run once, and return the exit status.
pub fn handle_run(cli: &Cli) -> ExitStatus {
    setup_logging(cli.verbose.unwrap_or(false));

    let dir = match resolve_directory(cli.dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            error!("{}", e);
            return ExitStatus::InvalidInput;
        }
    };

    let opts = setup_opts(cli, &dir);
    set_verbose(opts.verbose);
    debug!("{} CONFIG: {:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);
    if opts.dry_run {
        warn!("RUNNING IN DRY-RUN MODE. NO METADATA WILL BE WRITTEN.");
    }

    let status = match run_guarded(&dir, &opts) {
        Ok(report) => ExitStatus::from_report(&report),
        Err(e) => {
            error!("{}", e);
            ExitStatus::Failures
        }
    };

    if opts.pause || cli.is_interactive() {
        wait_for_enter();
    }
    status
}
