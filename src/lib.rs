//! OpenThread static library importer.
//!
//! Keeps the per-target prebuilt libraries of the SDK in line with a
//! declarative configuration: validates which libraries each target
//! requires or drops, builds them, copies the compiler-specific archives
//! into `../lib/<target>/<toolchain>/` and cleans build trees.

pub mod build;
pub mod catalog;
pub mod clean;
pub mod config;
pub mod error;
pub mod import;
pub mod preflight;
pub mod project;
pub mod status;
pub mod toolchain;
pub mod validate;

pub use error::{OtlibsError, Result};
pub use project::{Project, ProjectPaths};
pub use toolchain::{Toolchain, ToolchainFilter};
