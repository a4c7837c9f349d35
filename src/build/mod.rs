//! Building the required libraries with the GCC makefiles.
//!
//! For every target, each required library is built with
//! `make -C <target>/<target_dir>/armgcc`. The first failing build stops
//! the run.
//!
//! Only the GCC projects can be driven from the command line, so a
//! toolchain filter without `gcc` builds nothing.

mod make;

pub use make::{MakeInvocation, MAKE};

use std::path::Path;

use crate::error::{OtlibsError, Result};
use crate::project::Project;
use crate::toolchain::{Toolchain, ToolchainFilter, GCC_BUILD_SUBDIR};

/// One library build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub target: String,
    pub library: String,
    pub make: MakeInvocation,
}

/// Every build the project asks for, in order.
pub fn plan(project: &Project) -> Result<Vec<BuildStep>> {
    let mut steps = Vec::new();

    for (target, params) in &project.config.targets {
        let Some(libraries) = project.libraries.libraries(target) else {
            continue;
        };
        for (name, library) in libraries {
            if !params.required_libs.contains(name) {
                continue;
            }
            let lib_dir = library
                .target_dir
                .as_deref()
                .ok_or_else(|| OtlibsError::MissingTargetDir {
                    target: target.clone(),
                    library: name.clone(),
                })?;
            steps.push(BuildStep {
                target: target.clone(),
                library: name.clone(),
                make: MakeInvocation::new(
                    Path::new(target).join(lib_dir).join(GCC_BUILD_SUBDIR),
                ),
            });
        }
    }

    Ok(steps)
}

/// Whether `filter` selects the toolchain whose makefiles are driven.
pub fn runs_make(filter: &ToolchainFilter) -> bool {
    filter.allows(Toolchain::Gcc.name())
}

/// Run every planned build with `program` (normally [`MAKE`]).
///
/// Returns the steps that ran.
///
/// # Errors
///
/// [`OtlibsError::BuildFailed`] on the first non-zero exit.
pub fn build_libraries(
    project: &Project,
    filter: &ToolchainFilter,
    program: &str,
) -> Result<Vec<BuildStep>> {
    if !runs_make(filter) {
        log::info!("gcc not selected, nothing to build");
        return Ok(Vec::new());
    }

    let steps = plan(project)?;
    for step in &steps {
        let status = step.make.run(program, &project.paths.root)?;
        if !status.success() {
            return Err(OtlibsError::BuildFailed {
                target: step.target.clone(),
                library: step.library.clone(),
                status,
            });
        }
    }

    Ok(steps)
}
