pub mod config;
pub mod logger;
pub mod tempfiles;
pub mod xmpair_toml;

pub use config::*;
pub use logger::{Colors, set_verbose, setup_logging};
pub use tempfiles::{rename_temp_to_final, temp_path_for, write_atomic};
pub use xmpair_toml::{XmpairToml, apply_file_to_opts, load_xmpair_toml};
