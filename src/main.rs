//! xmpair CLI: write sidecar text files into the XMP dc:subject of matching images.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use xmpair::engine::arg_parser::Cli;
use xmpair::engine::handle_run;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let status = handle_run(&cli);
    log::debug!("Total time: {:?}", start_time.elapsed());
    status.into()
}
