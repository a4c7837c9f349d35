//! Import of built library archives into the shared `../lib` tree.
//!
//! # Flow
//!
//! ```text
//! 1. Load, resolve and validate (see Project::open)
//! 2. Recreate ../lib from scratch
//! 3. Scan lib/ for archives of unknown libraries
//! 4. Copy every required library, per target and toolchain
//! ```
//!
//! Nothing is copied unless steps 1 and 3 pass. A missing archive in
//! step 4 aborts the import; whatever was copied before stays in place.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::ResolvedCatalog;
use crate::error::{LibList, OtlibsError, Result};
use crate::project::Project;
use crate::toolchain::{Toolchain, ToolchainFilter};

/// One archive copied into the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedLibrary {
    pub target: String,
    pub toolchain: Toolchain,
    pub library: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Result of an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Copied archives, in copy order.
    pub copied: Vec<CopiedLibrary>,
    /// Configured toolchains skipped by the filter, as `(target, name)`.
    pub skipped: Vec<(String, String)>,
    /// Archives found in the scanned directory.
    pub artifacts_scanned: usize,
}

/// Run the whole import for an opened project.
pub fn import_libraries(project: &Project, filter: &ToolchainFilter) -> Result<ImportSummary> {
    let paths = &project.paths;
    let mut summary = ImportSummary::default();

    recreate_dir(&paths.output_dir())?;
    summary.artifacts_scanned = check_artifacts(&paths.artifacts_dir(), &project.libraries)?;

    for (target, params) in &project.config.targets {
        log::debug!("Processing target {}", target);

        for compiler in &params.compilers {
            if !filter.allows(compiler) {
                log::debug!("Skipping compiler {} for {}", compiler, target);
                summary.skipped.push((target.clone(), compiler.clone()));
                continue;
            }
            let toolchain = Toolchain::for_target(target, compiler)?;
            log::debug!("Compiler {}", toolchain);

            let out_dir = paths.resolve(&toolchain.output_dir(target));
            fs::create_dir_all(&out_dir).map_err(|e| OtlibsError::io(&out_dir, e))?;

            for lib in &params.required_libs {
                let library = project.libraries.library(target, lib).ok_or_else(|| {
                    OtlibsError::UnknownLibrary {
                        target: target.clone(),
                        library: lib.clone(),
                        list: LibList::Required,
                    }
                })?;
                let lib_paths = toolchain.paths(target, library, None)?;

                log::info!(
                    "Copying {} to {}",
                    lib_paths.source.display(),
                    lib_paths.destination.display()
                );
                copy_archive(
                    &paths.resolve(&lib_paths.source),
                    &paths.resolve(&lib_paths.destination),
                )?;

                summary.copied.push(CopiedLibrary {
                    target: target.clone(),
                    toolchain,
                    library: lib.clone(),
                    source: lib_paths.source,
                    destination: lib_paths.destination,
                });
            }
        }
    }

    Ok(summary)
}

/// Remove `dir` with everything in it, then create it empty.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        log::debug!("Removing {}", dir.display());
        fs::remove_dir_all(dir).map_err(|e| OtlibsError::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| OtlibsError::io(dir, e))
}

/// Library name of an archive file (`libfoo.a` / `libfoo.lib` -> `libfoo`).
pub fn archive_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(".a")
        .or_else(|| file_name.strip_suffix(".lib"))
}

/// Fail on any archive under `dir` that is not a known library.
///
/// Returns the number of archives seen. A missing directory holds none.
pub fn check_artifacts(dir: &Path, libraries: &ResolvedCatalog) -> Result<usize> {
    if !dir.exists() {
        log::debug!("No artifact directory at {}", dir.display());
        return Ok(0);
    }

    let known = libraries.all_names();
    let mut count = 0;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            OtlibsError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let Some(stem) = archive_stem(&file_name) else {
            continue;
        };
        count += 1;

        if !known.contains(stem) {
            log::error!("Unknown lib present {} ({})", stem, file_name);
            return Err(OtlibsError::UnknownArtifact {
                name: stem.to_string(),
                path: entry.path().to_path_buf(),
            });
        }
    }

    Ok(count)
}

fn copy_archive(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(OtlibsError::MissingArtifact {
            path: src.to_path_buf(),
        });
    }
    fs::copy(src, dst).map_err(|e| OtlibsError::io(dst, e))?;
    Ok(())
}
