//! Pipeline components: scan, match, process, report.

pub mod matcher;
pub mod orchestrator;
pub mod processor;
pub mod reporter;
pub mod scan;

pub use matcher::match_pairs;
pub use orchestrator::{collect_pairs, run_batch};
pub use processor::{payload_lines, process_pair, read_payload, write_subjects};
pub use reporter::{NO_PAIRS_MESSAGE, Reporter};
pub use scan::{ScanResult, scan_dir};
