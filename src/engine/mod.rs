//! Engine module: CLI surface, interactive input and path utilities

pub mod arg_parser;
pub mod handlers;
pub mod prompt;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use handlers::{ExitStatus, UnexpectedFailure, handle_run, run_guarded};
pub use prompt::{
    Answer, HELP_TEXT, InputError, parse_answer, prompt_for_directory, prompt_once,
    resolve_directory,
};
pub use tools::{classify_extension, is_os_hidden_file, split_file_name, validate_directory};
