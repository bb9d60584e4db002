//! Interactive input: ask for a directory until a valid one is given.

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::tools::validate_directory;
use crate::utils::config::{HELP_TOKENS, PROMPT};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Directory '{}' does not exist.", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("'{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),
    #[error("No directory given (input closed).")]
    InputClosed,
    #[error("read input: {0}")]
    Io(#[from] io::Error),
}

impl InputError {
    /// Errors the prompt recovers from by asking again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InputError::DirectoryNotFound(_) | InputError::NotADirectory(_)
        )
    }
}

pub const HELP_TEXT: &str = "
    Pairs image and text files in a directory and writes the text to each image's XMP metadata.

    Usage:
    ------
    0. Make backups of your files before running.
    1. Place image files and their text files in the same directory.
       - Each image needs a text file with the same base name,
         for example 'image1.jpg' and 'image1.txt'.
    2. Enter the directory path when prompted.
       - Type 'help' or '?' at the prompt to show this text again.

    Tips:
    -----
    - Supported image formats: .png, .jpg, .jpeg, .tiff
    - Each non-blank line of the .txt file becomes one entry of 'dc:subject',
      stored in an .xmp sidecar next to the image.
    - Existing 'dc:subject' values are overwritten.
    - When one name has several images, the first of .jpeg, .jpg, .png, .tiff is used.
";

/// One answer typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Answer {
    Help,
    Path(PathBuf),
}

/// Interpret one input line (trimmed; help tokens are case-insensitive).
pub fn parse_answer(line: &str) -> Answer {
    let line = line.trim();
    if HELP_TOKENS.contains(&line.to_lowercase().as_str()) {
        Answer::Help
    } else {
        Answer::Path(PathBuf::from(line))
    }
}

pub fn print_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let label = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
    writeln!(
        out,
        "{label} Enter the directory to process image-text pairs.\nType 'help' or '?' for more information.\n"
    )
}

/// Ask once. Help requests are answered in place; the first path answer is validated and returned.
pub fn prompt_once<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<PathBuf, InputError> {
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(InputError::InputClosed);
        }
        match parse_answer(&line) {
            Answer::Help => writeln!(out, "{HELP_TEXT}")?,
            Answer::Path(path) => return validate_directory(&path),
        }
    }
}

/// Ask until a valid directory is given. Stops on errors that asking again cannot fix.
pub fn prompt_for_directory<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<PathBuf, InputError> {
    loop {
        match prompt_once(input, out) {
            Err(e) if e.is_retryable() => writeln!(out, "{e} Please try again.")?,
            result => return result,
        }
    }
}

/// Block until Enter (or EOF) on stdin.
pub fn wait_for_enter() {
    print!("Press Enter to exit...");
    let _ = io::stdout().flush();
    let _ = io::stdin().lock().read_line(&mut String::new());
}

/// Directory from `dir` when given, otherwise from the interactive prompt on stdin/stdout.
pub fn resolve_directory(dir: Option<&Path>) -> Result<PathBuf, InputError> {
    match dir {
        Some(dir) => validate_directory(dir),
        None => {
            let mut out = io::stdout().lock();
            print_banner(&mut out)?;
            prompt_for_directory(&mut io::stdin().lock(), &mut out)
        }
    }
}
