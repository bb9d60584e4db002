//! xmpair: pair sidecar text files with images and write the text into XMP `dc:subject`.

pub mod engine;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use anyhow::Context;
use log::debug;
use std::path::Path;

use crate::engine::validate_directory;
use crate::store::{MetadataStore, XmpSidecarStore};
use crate::utils::write_atomic;

/// Result alias used by public xmpair API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: pair and process every image/text pair in `dir`.
///
/// Uses [`XmpSidecarStore`]; with `opts.dry_run` the same store reads and validates
/// existing sidecars but never writes them. Writes the JSON report when `opts.report_path` is set. Per-pair failures are in the
/// returned report, not in the `Err` path.
pub fn pair_dir(dir: &Path, opts: &Opts) -> Result<RunReport> {
    let mut store = if opts.dry_run {
        XmpSidecarStore::dry_run()
    } else {
        XmpSidecarStore::new()
    };
    pair_dir_with_store(dir, opts, &mut store)
}

/// Like [`pair_dir`] with a caller-supplied store.
pub fn pair_dir_with_store<S>(dir: &Path, opts: &Opts, store: &mut S) -> Result<RunReport>
where
    S: MetadataStore + ?Sized,
{
    let dir = validate_directory(dir)?;
    debug!("Pairing in {}", dir.display());
    let report = pipeline::run_batch(&dir, opts, store)?;
    if let Some(path) = &opts.report_path {
        write_report(path, &report)?;
    }
    Ok(report)
}

/// Write `report` as pretty JSON to `path` (atomic replace).
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    write_atomic(path, json.as_bytes())
        .with_context(|| format!("write run report to {}", path.display()))?;
    debug!("Report written to {}", path.display());
    Ok(())
}
