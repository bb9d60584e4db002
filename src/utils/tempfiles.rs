use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Temp path next to `final_path` used while committing (e.g. `photo.xmp.xmpair.tmp`).
pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    final_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.{}", PackagePaths::get().temp_suffix()))
}

/// Write `contents` to a temp file beside `final_path`, then rename over it.
/// The temp file is removed if the rename fails.
pub fn write_atomic(final_path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(final_path);
    fs::write(&temp_path, contents)
        .with_context(|| format!("write temp file {}", temp_path.display()))?;
    if let Err(e) = rename_temp_to_final(&temp_path, final_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "atomic rename temp file to final path ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })
}
