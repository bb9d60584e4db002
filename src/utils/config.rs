//! Application configuration constants.
//! Extension tables, field ids and package-derived names in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    temp_suffix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                temp_suffix: format!("{pkg}.tmp"),
            }
        })
    }

    /// Per-directory settings file (e.g. `.xmpair.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Suffix appended to a sidecar name while it is being committed.
    pub fn temp_suffix(&self) -> &str {
        &self.temp_suffix
    }
}

// ---- Candidate classification ----

/// Image extensions (lower-case, no dot) in tie-break priority order.
/// When one base name has several images, the earliest extension here wins.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "tiff"];

/// Extension of the text side of a pair.
pub const TEXT_EXTENSION: &str = "txt";

/// Priority of an image extension; lower wins. `None` when not an image extension.
pub fn image_extension_priority(ext: &str) -> Option<usize> {
    IMAGE_EXTENSIONS.iter().position(|e| *e == ext)
}

// ---- Metadata ----

/// The single field every pair writes to.
pub const SUBJECT_FIELD: &str = "Xmp.dc.subject";

/// Extension of the XMP sidecar written next to an image.
pub const SIDECAR_EXTENSION: &str = "xmp";

// ---- Interactive prompt ----

pub const PROMPT: &str = "Input Path: ";

/// Answers that show the usage text instead of being treated as a path (compared lower-cased).
pub const HELP_TOKENS: [&str; 2] = ["help", "?"];
