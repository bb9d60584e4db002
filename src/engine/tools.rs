//! Path and filter utilities

use std::path::{Path, PathBuf};

use crate::CandidateKind;
use crate::engine::InputError;
use crate::utils::config::{TEXT_EXTENSION, image_extension_priority};

/// Split a file name into `(base_name, lower-cased extension)` at the last dot.
/// `a.b.txt` → `("a.b", "txt")`. Leading dots belong to the base name, so `.hidden`,
/// `..txt` and `noext` have an empty extension.
pub fn split_file_name(name: &str) -> (String, String) {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => (
            name[..dot].to_string(),
            name[dot + 1..].to_ascii_lowercase(),
        ),
        _ => (name.to_string(), String::new()),
    }
}

/// Classify a lower-cased extension. `None` for files that take no part in pairing.
pub fn classify_extension(ext: &str) -> Option<CandidateKind> {
    if image_extension_priority(ext).is_some() {
        Some(CandidateKind::Image)
    } else if ext == TEXT_EXTENSION {
        Some(CandidateKind::Text)
    } else {
        None
    }
}

/// Check if a file should be excluded based on OS-specific hidden files
pub fn is_os_hidden_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        match name {
            // macOS
            ".DS_Store" | ".AppleDouble" | ".LSOverride" => true,
            // Windows
            "Thumbs.db" | "ehthumbs.db" | "Desktop.ini" => true,
            // Linux
            ".directory" => true,
            // macOS resource fork files start with ._
            _ => name.starts_with("._"),
        }
    } else {
        false
    }
}

/// Precondition for scanning: `path` exists and is a directory.
pub fn validate_directory(path: &Path) -> Result<PathBuf, InputError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(path.to_path_buf()),
        Ok(_) => Err(InputError::NotADirectory(path.to_path_buf())),
        Err(_) => Err(InputError::DirectoryNotFound(path.to_path_buf())),
    }
}
