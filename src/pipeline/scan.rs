//! Directory scanner: classify the immediate entries of one directory.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;
use walkdir::WalkDir;

use crate::engine::tools::{classify_extension, is_os_hidden_file, split_file_name};
use crate::{Candidate, CandidateKind};

/// Image and text candidates found in one directory, in no particular order.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub images: Vec<Candidate>,
    pub texts: Vec<Candidate>,
}

/// List `dir` (non-recursive) and classify each regular file by extension.
/// Caller must have validated `dir`; unreadable entries are logged and skipped.
pub fn scan_dir(dir: &Path) -> Result<ScanResult> {
    // Opening the directory itself is the one failure that aborts the scan.
    std::fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;

    let mut result = ScanResult::default();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_os_hidden_file(path) {
            debug!("Skipping OS file {}", path.display());
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non-UTF-8 file name {}", path.display());
            continue;
        };
        let (base_name, extension) = split_file_name(name);
        let Some(kind) = classify_extension(&extension) else {
            continue;
        };
        let candidate = Candidate {
            base_name,
            extension,
            full_path: path.to_path_buf(),
            kind,
        };
        match kind {
            CandidateKind::Image => result.images.push(candidate),
            CandidateKind::Text => result.texts.push(candidate),
        }
    }
    debug!(
        "Scanned {}: {} image(s), {} text file(s)",
        dir.display(),
        result.images.len(),
        result.texts.len()
    );
    Ok(result)
}
