//! Pair processor: load one text payload and write it to the image's subject field.

use anyhow::{Context, Result};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use crate::store::{MetadataStore, StoreError, StoreSession};
use crate::utils::config::SUBJECT_FIELD;
use crate::{Pair, PairOutcome};

/// Every character treated as a line boundary. `\r\n` leaves an empty piece between
/// its halves, which the blank-line filter drops.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split text into subject entries.
///
/// The whole text is trimmed once (plus a leading BOM); blank lines are dropped and the
/// remaining lines are kept as-is, in order. Lone `\r` and the Unicode separators in
/// [`LINE_BREAKS`] split lines too.
pub fn payload_lines(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .trim()
        .split(LINE_BREAKS)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read `path` as UTF-8 and turn it into subject entries.
pub fn read_payload(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let text =
        String::from_utf8(bytes).with_context(|| format!("decode {} as UTF-8", path.display()))?;
    Ok(payload_lines(&text))
}

/// Overwrite the subject field of `image` with `lines` and commit.
/// The session is released before returning on every path.
pub fn write_subjects<S>(store: &mut S, image: &Path, lines: Vec<String>) -> Result<(), StoreError>
where
    S: MetadataStore + ?Sized,
{
    let mut session = StoreSession::open(store, image);
    let existing = session.read_fields()?;
    if existing.contains_key(SUBJECT_FIELD) {
        log::debug!("Overwriting existing {} on {}", SUBJECT_FIELD, image.display());
    }
    session.write_field(SUBJECT_FIELD, lines)?;
    session.commit()
}

/// Process one pair. Never fails: every error becomes a [`PairOutcome`].
pub fn process_pair<S>(store: &mut S, pair: &Pair) -> PairOutcome
where
    S: MetadataStore + ?Sized,
{
    let lines = match read_payload(&pair.text.full_path) {
        Ok(lines) => lines,
        Err(e) => return PairOutcome::ReadFailure(format!("{e:#}")),
    };
    let image = pair.image.full_path.as_path();
    match catch_unwind(AssertUnwindSafe(|| write_subjects(store, image, lines))) {
        Ok(Ok(())) => PairOutcome::Success,
        Ok(Err(e)) => PairOutcome::WriteFailure(e.to_string()),
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "metadata store panicked".to_string());
            PairOutcome::WriteFailure(msg)
        }
    }
}
