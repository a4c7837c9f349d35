//! Removal of per-target build directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ImportConfig;
use crate::error::{OtlibsError, Result};
use crate::project::ProjectPaths;

/// Remove every immediate subdirectory of every target directory.
///
/// Files directly inside a target directory are kept. Returns the removed
/// directories.
///
/// # Errors
///
/// Fails on the first target directory that does not exist or cannot be
/// read, or on the first removal that fails.
pub fn clean_targets(paths: &ProjectPaths, config: &ImportConfig) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for target in config.targets.keys() {
        for subdir in subdirectories(&paths.target_dir(target))? {
            log::info!("Removing {}", subdir.display());
            fs::remove_dir_all(&subdir).map_err(|e| OtlibsError::io(&subdir, e))?;
            removed.push(subdir);
        }
    }

    Ok(removed)
}

/// Immediate subdirectories of `dir`, sorted.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| OtlibsError::io(dir, e))? {
        let entry = entry.map_err(|e| OtlibsError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
