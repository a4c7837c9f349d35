//! Build and import status of every required library.

use std::path::PathBuf;

use crate::error::{LibList, OtlibsError, Result};
use crate::project::Project;
use crate::toolchain::Toolchain;

/// State of one required library for one toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryStatus {
    pub target: String,
    pub toolchain: Toolchain,
    pub library: String,
    /// Project-relative archive the toolchain builds.
    pub source: PathBuf,
    /// Project-relative import destination.
    pub destination: PathBuf,
    pub built: bool,
    pub imported: bool,
}

/// Status of every (target, toolchain, required library).
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    pub entries: Vec<LibraryStatus>,
}

/// What to run next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Build,
    Import,
    Done,
}

impl StatusReport {
    pub fn missing_builds(&self) -> usize {
        self.entries.iter().filter(|e| !e.built).count()
    }

    pub fn missing_imports(&self) -> usize {
        self.entries.iter().filter(|e| !e.imported).count()
    }

    pub fn next_step(&self) -> NextStep {
        if self.missing_builds() > 0 {
            NextStep::Build
        } else if self.missing_imports() > 0 {
            NextStep::Import
        } else {
            NextStep::Done
        }
    }
}

/// Collect status for all targets, or only `only_target`.
pub fn collect(project: &Project, only_target: Option<&str>) -> Result<StatusReport> {
    if let Some(target) = only_target {
        project.config.target(target)?;
    }

    let mut report = StatusReport::default();
    for (target, params) in &project.config.targets {
        if only_target.is_some_and(|t| t != target) {
            continue;
        }
        for compiler in &params.compilers {
            let toolchain = Toolchain::for_target(target, compiler)?;
            for lib in &params.required_libs {
                let library = project.libraries.library(target, lib).ok_or_else(|| {
                    OtlibsError::UnknownLibrary {
                        target: target.clone(),
                        library: lib.clone(),
                        list: LibList::Required,
                    }
                })?;
                let paths = toolchain.paths(target, library, None)?;
                report.entries.push(LibraryStatus {
                    target: target.clone(),
                    toolchain,
                    library: lib.clone(),
                    built: project.paths.resolve(&paths.source).is_file(),
                    imported: project.paths.resolve(&paths.destination).is_file(),
                    source: paths.source,
                    destination: paths.destination,
                });
            }
        }
    }

    Ok(report)
}
