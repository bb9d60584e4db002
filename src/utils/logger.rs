use colored::{Color, Colorize};
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Colors for outcome and summary lines.
pub struct Colors;

impl Colors {
    pub const SUCCESS: Color = Color::Green;
    pub const FAILURE: Color = Color::Red;
    pub const SUMMARY: Color = Color::Cyan;

    pub fn colorize(color: Color, text: &str) -> String {
        text.color(color).to_string()
    }
}

/// Raise or lower our verbosity after setup (e.g. once `.xmpair.toml` has been read).
pub fn set_verbose(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    log::set_max_level(level);
}

pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    // try_init: lib callers and tests may already have installed a logger.
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), LevelFilter::Debug) // Our crate: capped by set_verbose
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
    set_verbose(verbose);
}
