//! Public and internal types for the xmpair API and pipeline.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Which side of a pair a discovered file can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Image,
    Text,
}

/// A file found by the scanner that may take part in a pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// File name without its extension. Join key for pairing (case-sensitive).
    pub base_name: String,
    /// Lower-cased extension without the dot.
    pub extension: String,
    pub full_path: PathBuf,
    pub kind: CandidateKind,
}

impl Candidate {
    /// File name as it appears on disk (used for ordering and log lines).
    pub fn file_name(&self) -> String {
        self.full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.base_name.clone())
    }
}

/// One image and one text file sharing a base name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pair {
    pub image: Candidate,
    pub text: Candidate,
}

impl Pair {
    pub fn base_name(&self) -> &str {
        &self.image.base_name
    }
}

/// Result of processing a single pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum PairOutcome {
    Success,
    /// Text file could not be read or decoded. No write was attempted.
    ReadFailure(String),
    /// Metadata store rejected the write or commit.
    WriteFailure(String),
}

impl PairOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PairOutcome::Success)
    }
}

impl fmt::Display for PairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairOutcome::Success => write!(f, "success"),
            PairOutcome::ReadFailure(reason) => write!(f, "read failure: {reason}"),
            PairOutcome::WriteFailure(reason) => write!(f, "write failure: {reason}"),
        }
    }
}

/// Aggregate counts for a run. Only built from outcomes, see [`RunSummary::from_outcomes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a PairOutcome>,
    {
        outcomes
            .into_iter()
            .fold(RunSummary::default(), |mut acc, outcome| {
                acc.total += 1;
                if outcome.is_success() {
                    acc.succeeded += 1;
                } else {
                    acc.failed += 1;
                }
                acc
            })
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total pairs: {}, Successfully processed: {}, Failed to process: {}",
            self.total, self.succeeded, self.failed
        )
    }
}

/// One processed pair as recorded in a [`RunReport`].
#[derive(Clone, Debug, Serialize)]
pub struct PairResult {
    pub image: PathBuf,
    pub text: PathBuf,
    pub outcome: PairOutcome,
}

/// Everything a run produced. `summary` is `None` when no pairs were found.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub results: Vec<PairResult>,
    pub summary: Option<RunSummary>,
}

impl RunReport {
    /// True when nothing failed (also true for an empty run).
    pub fn is_clean(&self) -> bool {
        self.summary.is_none_or(|s| s.all_succeeded())
    }
}

/// Run options (CLI, `.xmpair.toml` and lib callers).
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Debug-level logging.
    pub verbose: bool,
    /// Read and validate every pair but keep all writes in memory.
    pub dry_run: bool,
    /// Write a JSON [`RunReport`] here after the run.
    pub report_path: Option<PathBuf>,
    /// Wait for Enter before the process exits.
    pub pause: bool,
}
