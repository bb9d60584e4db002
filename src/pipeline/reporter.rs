//! Run reporter: one line per outcome as it happens, one summary line at the end.

use log::{info, warn};
use std::path::Path;

use crate::utils::Colors;
use crate::{Pair, PairOutcome, PairResult, RunSummary};

/// Message logged when a directory has nothing to pair.
pub const NO_PAIRS_MESSAGE: &str = "No matching pairs of image and text files found in the directory.";

/// Accumulates outcomes for one run.
///
/// If dropped before [`Reporter::finish`] (a run that failed unexpectedly), the partial
/// summary is still logged.
#[derive(Default)]
pub struct Reporter {
    results: Vec<PairResult>,
    finished: bool,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log "no pairs found". The run has no summary.
    pub fn no_pairs(&mut self) {
        info!("{}", NO_PAIRS_MESSAGE);
        self.finished = true;
    }

    /// Record and log one outcome.
    pub fn record(&mut self, pair: &Pair, outcome: PairOutcome) {
        let text = file_name(&pair.text.full_path);
        let image = file_name(&pair.image.full_path);
        match &outcome {
            PairOutcome::Success => info!(
                "{} - {} to > {}",
                Colors::colorize(Colors::SUCCESS, "Success"),
                text,
                image
            ),
            PairOutcome::ReadFailure(reason) => warn!(
                "{} reading '{}': {}",
                Colors::colorize(Colors::FAILURE, "Error"),
                pair.text.full_path.display(),
                reason
            ),
            PairOutcome::WriteFailure(reason) => warn!(
                "{} to write metadata to '{}': {}",
                Colors::colorize(Colors::FAILURE, "Failed"),
                pair.image.full_path.display(),
                reason
            ),
        }
        self.results.push(PairResult {
            image: pair.image.full_path.clone(),
            text: pair.text.full_path.clone(),
            outcome,
        });
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(self.results.iter().map(|r| &r.outcome))
    }

    /// Log the summary line and hand back everything recorded.
    pub fn finish(mut self) -> (Vec<PairResult>, RunSummary) {
        let summary = self.summary();
        info!(
            "Done! {}",
            Colors::colorize(Colors::SUMMARY, &summary.to_string())
        );
        self.finished = true;
        (std::mem::take(&mut self.results), summary)
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if !self.finished && !self.results.is_empty() {
            warn!("Run interrupted. Partial summary: {}", self.summary());
        }
    }
}
