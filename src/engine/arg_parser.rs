use clap::Parser;
use std::path::PathBuf;

/// Write sidecar text files into the XMP dc:subject field of matching images.
#[derive(Clone, Parser)]
#[command(name = "xmpair")]
#[command(
    about = "Pair image and text files by base name and write each text file's lines to the image's XMP dc:subject."
)]
pub struct Cli {
    /// Directory holding the image and text files. Prompts for it when omitted.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Read and validate every pair and report outcomes, but write nothing.
    #[arg(long, short = 'n', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub dry_run: Option<bool>,

    /// Write a JSON report of the run to PATH.
    #[arg(long, short = 'r', value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Wait for Enter before exiting. Always on when prompting for DIR.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub pause: Option<bool>,
}

impl Cli {
    /// True when DIR was not given and the directory comes from the prompt.
    pub fn is_interactive(&self) -> bool {
        self.dir.is_none()
    }
}
