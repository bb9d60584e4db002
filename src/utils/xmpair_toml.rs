//! Load `.xmpair.toml` from the target directory (CLI only). Lib callers pass [`Opts`] directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct XmpairToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    verbose: Option<bool>,
    dry_run: Option<bool>,
    report: Option<String>,
    pause: Option<bool>,
}

/// Load the settings file from `dir` if present. Returns None if missing; logs and returns None if malformed.
pub fn load_xmpair_toml(dir: &Path) -> Option<XmpairToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_xmpair_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_xmpair_toml(s: &str) -> Result<XmpairToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($file:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $file.$file_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
/// A relative `report` path is resolved against `dir`.
pub fn apply_file_to_opts(file: &XmpairToml, dir: &Path, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, verbose => verbose);
    apply_file_opt!(s, opts, dry_run => dry_run);
    apply_file_opt!(s, opts, pause => pause);
    if let Some(ref p) = s.report {
        let p = PathBuf::from(p);
        opts.report_path = Some(if p.is_relative() { dir.join(p) } else { p });
    }
}
