use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::pipeline::{Reporter, match_pairs, process_pair, scan_dir};
use crate::store::MetadataStore;
use crate::{Opts, Pair, RunReport};

/// Scan `dir` and return its pairs in processing order.
pub fn collect_pairs(dir: &Path) -> Result<Vec<Pair>> {
    let scan = scan_dir(dir)?;
    let pairs = match_pairs(&scan.images, &scan.texts);
    debug!("Matched {} pair(s)", pairs.len());
    Ok(pairs)
}

/// One run over `dir`: scan → match → process each pair in order → report.
///
/// Per-pair failures end up in the report; only a failure to scan the directory is an `Err`.
/// `dir` must already be validated.
pub fn run_batch<S>(dir: &Path, opts: &Opts, store: &mut S) -> Result<RunReport>
where
    S: MetadataStore + ?Sized,
{
    let mut reporter = Reporter::new();
    let pairs = collect_pairs(dir)?;

    if pairs.is_empty() {
        reporter.no_pairs();
        return Ok(RunReport {
            directory: dir.to_path_buf(),
            dry_run: opts.dry_run,
            results: Vec::new(),
            summary: None,
        });
    }

    for (i, pair) in pairs.iter().enumerate() {
        debug!("[{}/{}] {}", i + 1, pairs.len(), pair.base_name());
        let outcome = process_pair(store, pair);
        reporter.record(pair, outcome);
    }
    let (results, summary) = reporter.finish();

    Ok(RunReport {
        directory: dir.to_path_buf(),
        dry_run: opts.dry_run,
        results,
        summary: Some(summary),
    })
}
