//! Invocation of `make` for a single library build directory.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::error::{OtlibsError, Result};

/// Default build program.
pub const MAKE: &str = "make";

/// A `make -C <dir>` run, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeInvocation {
    /// Directory passed to `-C`.
    pub dir: PathBuf,
}

impl MakeInvocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build the command for `program`, running from `root`.
    pub fn command(&self, program: &str, root: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.arg("-C").arg(&self.dir).current_dir(root);
        cmd
    }

    /// Run to completion, inheriting stdout/stderr.
    ///
    /// A spawn failure is an I/O error on the build directory; the exit
    /// status is returned as-is for the caller to judge.
    pub fn run(&self, program: &str, root: &Path) -> Result<ExitStatus> {
        log::info!("Running {} -C {}", program, self.dir.display());
        self.command(program, root)
            .status()
            .map_err(|e| OtlibsError::io(root.join(&self.dir), e))
    }
}
